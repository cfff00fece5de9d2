// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::home::Home;
use anyhow::bail;

pub fn show(home: &Home) -> anyhow::Result<()> {
    let settings = home.settings();
    println!("path: {}", home.settings_path().display());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub fn set(home: &Home, max_lca_height: Option<u32>) -> anyhow::Result<()> {
    let Some(height) = max_lca_height else {
        bail!("nothing to set; pass --max-lca-height N");
    };
    if height > cyberspace_kernel::config::AXIS_BITS {
        bail!("--max-lca-height must be at most {}", cyberspace_kernel::config::AXIS_BITS);
    }
    let mut settings = home.settings();
    settings.default_max_lca_height = height;
    settings.save(&home.settings_path())?;
    println!("default_max_lca_height: {height}");
    Ok(())
}
