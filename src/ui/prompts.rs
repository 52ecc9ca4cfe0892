use anyhow::Result;
use dialoguer::Password;

/// Ask for the API password without echoing it
pub fn prompt_password(login: &str, url: &str) -> Result<String> {
    let password = Password::new()
        .with_prompt(format!("Password for {} on {}", login, url))
        .interact()?;
    Ok(password)
}
