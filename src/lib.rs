pub mod arm;
pub mod eer;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod serializer;
pub mod transform;

use wasm_bindgen::prelude::*;

use parser::Parser;
use transform::Transformer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Transform ARM notation source into an EER model.
///
/// `format` is `"notation"` for the serialized form; anything else (or
/// nothing) yields the textual rendering.
#[wasm_bindgen(js_name = "armToEer")]
pub fn transform_arm(source: &str, format: Option<String>) -> Result<String, String> {
    let mut parser = Parser::new(source).map_err(|e| e.to_string())?;
    let arm = parser.parse().map_err(|e| e.to_string())?;

    let eer = Transformer::default()
        .transform(&arm)
        .map_err(|e| e.to_string())?;

    let output = match format.as_deref() {
        Some("notation") => serializer::serialize_eer(&eer),
        _ => eer.to_string(),
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_arm_text() {
        let out = transform_arm("entity Movie { MovieID pk Name: string }", None).unwrap();
        assert_eq!(
            out,
            "EER Model:\n----------\nMovie(__MovieID__ (anyType), Name (string))\n    Identifier: ['MovieID']"
        );
    }

    #[test]
    fn test_transform_arm_notation() {
        let out = transform_arm("entity Movie { MovieID pk }", Some("notation".into())).unwrap();
        assert!(out.contains("identifier(MovieID)"));
    }

    #[test]
    fn test_transform_arm_reports_errors() {
        let err = transform_arm("entity Movie { primary_key(MovieID) }", None).unwrap_err();
        assert!(err.contains("Constraint violation"));
    }
}
