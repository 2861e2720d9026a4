// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use household_ledger_core::errors::CoreError;
use household_ledger_core::models::month::Month;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_month() {
        let err = CoreError::InvalidMonth("2024-13".into());
        assert_eq!(err.to_string(), "Invalid month '2024-13': expected YYYY-MM");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Transfer amount must be positive".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Transfer amount must be positive"
        );
    }

    #[test]
    fn category_not_found() {
        let err = CoreError::CategoryNotFound("food/snacks".into());
        assert_eq!(err.to_string(), "Category not found: food/snacks");
    }

    #[test]
    fn account_not_found() {
        let err = CoreError::AccountNotFound("wallet".into());
        assert_eq!(err.to_string(), "Account not found: wallet");
    }

    #[test]
    fn recurring_not_found() {
        let err = CoreError::RecurringNotFound("rec_123".into());
        assert_eq!(err.to_string(), "Recurring item not found: rec_123");
    }

    #[test]
    fn transfer_not_found() {
        let err = CoreError::TransferNotFound {
            month: "2024-01".into(),
            index: 2,
        };
        assert_eq!(err.to_string(), "Transfer #2 not found in 2024-01");
    }

    #[test]
    fn duplicate_id() {
        let err = CoreError::DuplicateId("save".into());
        assert_eq!(err.to_string(), "Duplicate id: save");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("buffer overflow".into());
        assert_eq!(err.to_string(), "Serialization error: buffer overflow");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }
}

// ── Debug trait ─────────────────────────────────────────────────────

mod debug_trait {
    use super::*;

    #[test]
    fn all_variants_are_debug() {
        let variants = vec![
            CoreError::InvalidMonth("x".into()),
            CoreError::ValidationError("x".into()),
            CoreError::CategoryNotFound("x".into()),
            CoreError::AccountNotFound("x".into()),
            CoreError::RecurringNotFound("x".into()),
            CoreError::TransferNotFound {
                month: "x".into(),
                index: 0,
            },
            CoreError::DuplicateId("x".into()),
            CoreError::Serialization("x".into()),
            CoreError::Deserialization("x".into()),
        ];
        for v in variants {
            let debug = format!("{:?}", v);
            assert!(!debug.is_empty());
        }
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let core_err: CoreError = json_err.into();
        match core_err {
            CoreError::Deserialization(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Deserialization, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error_eof() {
        let json_err = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        let core_err: CoreError = json_err.into();
        match core_err {
            CoreError::Deserialization(msg) => assert!(msg.contains("EOF")),
            other => panic!("Expected Deserialization, got {:?}", other),
        }
    }

    #[test]
    fn month_parse_failure_is_invalid_month() {
        match "2024/01".parse::<Month>() {
            Err(CoreError::InvalidMonth(value)) => assert_eq!(value, "2024/01"),
            other => panic!("Expected InvalidMonth, got {:?}", other),
        }
    }

    #[test]
    fn month_deserialize_failure_surfaces_as_deserialization() {
        let json_err = serde_json::from_str::<Month>("\"2024-1\"").unwrap_err();
        let core_err: CoreError = json_err.into();
        match core_err {
            CoreError::Deserialization(msg) => assert!(msg.contains("2024-1")),
            other => panic!("Expected Deserialization, got {:?}", other),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────

mod std_error {
    use super::*;

    #[test]
    fn core_error_implements_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::ValidationError("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn core_error_implements_send() {
        fn assert_send<T: Send>() {}
        assert_send::<CoreError>();
    }

    #[test]
    fn core_error_implements_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<CoreError>();
    }
}

// ── Edge cases ──────────────────────────────────────────────────────

mod edge_cases {
    use super::*;

    #[test]
    fn unicode_in_error_message() {
        let err = CoreError::CategoryNotFound("食費".into());
        assert_eq!(err.to_string(), "Category not found: 食費");
    }

    #[test]
    fn empty_month_string() {
        let err = "".parse::<Month>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid month '': expected YYYY-MM");
    }
}
