//! Natural-key derivation rules for the dimension tables.
//!
//! Product family and customer are both derived from the model number by
//! fixed-format rules inherited from the station's labelling scheme. The
//! rules are deliberately not configurable — they must match what the rest
//! of the QA tooling expects.

use thiserror::Error;

/// Errors from natural-key derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The model number is too short (or not sliceable at a character
    /// boundary) for the fixed-offset family-code rule.
    #[error(
        "model number '{model}' is too short for family-code derivation \
         (need characters {start}..{end})"
    )]
    ModelNumberTooShort {
        /// The offending model number.
        model: String,
        /// First required character offset.
        start: usize,
        /// One past the last required character offset.
        end: usize,
    },
}

/// Derive the product-family code from a model number.
///
/// Models starting with `S` carry the family code at offset 5, length 4;
/// all other models at offset 0, length 3. A model number shorter than the
/// required range is a recoverable error, not a panic.
pub fn family_code(model: &str) -> Result<String, KeyError> {
    let (start, end) = if model.starts_with('S') { (5, 9) } else { (0, 3) };

    model
        .get(start..end)
        .map(str::to_string)
        .ok_or_else(|| KeyError::ModelNumberTooShort {
            model: model.to_string(),
            start,
            end,
        })
}

/// Customer owning a product, derived from the model number's leading
/// character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Customer {
    /// Models starting with `S`.
    Sgre,
    /// Models starting with `V`.
    Vestas,
    /// Everything else.
    Other,
}

impl Customer {
    /// Derive the customer from a model number.
    pub fn from_model_number(model: &str) -> Self {
        if model.starts_with('S') {
            Self::Sgre
        } else if model.starts_with('V') {
            Self::Vestas
        } else {
            Self::Other
        }
    }

    /// Customer name as stored in the `Customer` dimension table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sgre => "SGRE",
            Self::Vestas => "VESTAS",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_code_for_s_models_is_offset_5_len_4() {
        assert_eq!(family_code("S1234ABCD99").unwrap(), "ABCD");
        assert_eq!(family_code("S0000WXYZ").unwrap(), "WXYZ");
    }

    #[test]
    fn family_code_for_other_models_is_leading_3() {
        assert_eq!(family_code("V52-100").unwrap(), "V52");
        assert_eq!(family_code("ABC123").unwrap(), "ABC");
    }

    #[test]
    fn short_s_model_is_a_recoverable_error() {
        let err = family_code("S123").unwrap_err();
        assert_eq!(
            err,
            KeyError::ModelNumberTooShort {
                model: "S123".to_string(),
                start: 5,
                end: 9,
            }
        );
    }

    #[test]
    fn short_other_model_is_a_recoverable_error() {
        assert!(matches!(
            family_code("AB"),
            Err(KeyError::ModelNumberTooShort { .. })
        ));
    }

    #[test]
    fn non_boundary_slice_is_an_error_not_a_panic() {
        // Multi-byte character straddling the slice end.
        assert!(family_code("Sééé").is_err());
    }

    #[test]
    fn customer_mapping() {
        assert_eq!(Customer::from_model_number("S1234ABCD"), Customer::Sgre);
        assert_eq!(Customer::from_model_number("V52-100"), Customer::Vestas);
        assert_eq!(Customer::from_model_number("X99"), Customer::Other);
        assert_eq!(Customer::from_model_number(""), Customer::Other);
    }

    #[test]
    fn customer_names_match_dimension_rows() {
        assert_eq!(Customer::Sgre.as_str(), "SGRE");
        assert_eq!(Customer::Vestas.as_str(), "VESTAS");
        assert_eq!(Customer::Other.as_str(), "Other");
    }
}
