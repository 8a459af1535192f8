use color_eyre::Result;
use dialoguer::Input;

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input = input.default(default_value.to_string());
    }

    input
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret without echoing it
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let value = rpassword::prompt_password(format!("{}: ", prompt))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read {}: {}", prompt, e))?;
    Ok(value.trim().to_string())
}
