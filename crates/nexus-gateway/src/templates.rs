//! Sample inputs per operation mode.

use crate::types::OperationMode;

/// A starter input that exercises the given mode
pub fn sample_input(mode: OperationMode) -> &'static str {
    match mode {
        OperationMode::CorsProxy => {
            "I'm trying to fetch data from api.example.com using Puter.js in the browser, but I'm getting a CORS error. Generate the fix."
        }
        OperationMode::Normalization => {
            "User John Doe (ID: 992) signed up at 12:00 PM via Landing Page B."
        }
        OperationMode::DebugAnalysis => {
            "Error: 500 Internal Server Error\nTimestamp: 1678888\nMessage: Invalid Token"
        }
    }
}

/// Placeholder hint for the input buffer
pub fn input_hint(mode: OperationMode) -> &'static str {
    match mode {
        OperationMode::CorsProxy => {
            "Describe the CORS error or paste the URL you are trying to reach..."
        }
        _ => "Paste raw logs, messy XML, or unstructured text here...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_has_a_sample() {
        for mode in OperationMode::ALL {
            assert!(!sample_input(mode).trim().is_empty());
            assert!(!input_hint(mode).is_empty());
        }
    }

    #[test]
    fn test_cors_sample_names_browser_client() {
        assert_eq!(
            sample_input(OperationMode::CorsProxy),
            "I'm trying to fetch data from api.example.com using Puter.js in the browser, but I'm getting a CORS error. Generate the fix."
        );
    }
}
