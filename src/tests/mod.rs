// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod vector_tests;
pub mod soundness_tests;
pub mod cursor_tests;
