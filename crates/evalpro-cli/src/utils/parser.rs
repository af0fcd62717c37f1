use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid assignment '{0}'. Expected 'KEY=VALUE' (e.g., 'CUDA_VISIBLE_DEVICES=0').")]
    MissingSeparator(String),

    #[error("Key cannot be empty in assignment '{0}'.")]
    EmptyKey(String),
}

/// Splits `KEY=VALUE` at the first `=`. The value may be empty or contain further `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), ParseError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(s.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(s.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}
