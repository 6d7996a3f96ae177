/// Tests for data structures and their serialization
///
/// These tests ensure BuildInformation and its diagnostic records keep
/// structural-equality semantics and survive a trip through JSON.

#[cfg(test)]
mod tests {
    use crate::types::*;

    fn sample_info() -> BuildInformation {
        BuildInformationBuilder::new("ios")
            .errors(vec![CompilerMessage::new("/src/App.swift", 10, "cannot find 'foo' in scope", MessageKind::Error)])
            .warnings(vec![
                CompilerMessage::new("/src/Foo.swift", 42, "unused variable 'x'", MessageKind::Warning),
                CompilerMessage::new("/src/Bar.swift", 7, "'init()' is deprecated", MessageKind::Warning),
            ])
            .unit_tests(vec![UnitTestMessage::new("testLogin", "XCTAssertTrue failed")])
            .build()
    }

    #[test]
    fn test_builder_deduplicates_structurally_equal_messages() {
        let message = CompilerMessage::new("/src/Foo.swift", 42, "unused variable 'x'", MessageKind::Warning);
        let info = BuildInformationBuilder::new("ios")
            .warnings(vec![message.clone(), message.clone()])
            .warnings(vec![message])
            .build();

        assert_eq!(info.warnings().len(), 1);
    }

    #[test]
    fn test_messages_differing_in_one_field_are_distinct() {
        let info = BuildInformationBuilder::new("ios")
            .errors(vec![
                CompilerMessage::new("/src/Foo.swift", 42, "boom", MessageKind::Error),
                CompilerMessage::new("/src/Foo.swift", 43, "boom", MessageKind::Error),
                CompilerMessage::new("/src/Foo.swift", 42, "boom!", MessageKind::Error),
                CompilerMessage::new("/src/Foo.swift", 42, "boom", MessageKind::Warning),
            ])
            .unit_tests(vec![UnitTestMessage::new("testA", "x"), UnitTestMessage::new("testA", "y")])
            .build();

        assert_eq!(info.errors().len(), 4);
        assert_eq!(info.unit_tests().len(), 2);
    }

    #[test]
    fn test_iteration_order_is_file_then_line_then_message() {
        let info = BuildInformationBuilder::new("android")
            .errors(vec![
                CompilerMessage::new("b.kt", 1, "z", MessageKind::Error),
                CompilerMessage::new("a.kt", 20, "a", MessageKind::Error),
                CompilerMessage::new("a.kt", 3, "m", MessageKind::Error),
                CompilerMessage::new("a.kt", 3, "b", MessageKind::Error),
            ])
            .build();

        let order: Vec<String> = info.errors().iter().map(|m| format!("{} {}", m.location(), m.message)).collect();
        assert_eq!(order, vec!["a.kt:3 b", "a.kt:3 m", "a.kt:20 a", "b.kt:1 z"]);
    }

    #[test]
    fn test_build_information_serialization() {
        let info = sample_info();

        let json = serde_json::to_string(&info).unwrap();
        let deserialized: BuildInformation = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, info);
        assert_eq!(deserialized.platform(), "ios");
    }

    #[test]
    fn test_message_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MessageKind::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_missing_categories_deserialize_as_empty() {
        let info: BuildInformation = serde_json::from_str(r#"{"platform":"android"}"#).unwrap();
        assert!(info.is_empty());
        assert_eq!(info.len(), 0);
    }

    #[test]
    fn test_category_must_match_message_kind() {
        let misfiled = r#"{"platform":"ios","errors":[{"file":"A.swift","line":1,"message":"m","kind":"warning"}]}"#;
        let err = serde_json::from_str::<BuildInformation>(misfiled).unwrap_err();
        assert!(err.to_string().contains("errors holds a warning at A.swift:1"));

        let misfiled = r#"{"platform":"ios","warnings":[{"file":"B.swift","line":2,"message":"m","kind":"error"}]}"#;
        assert!(serde_json::from_str::<BuildInformation>(misfiled).is_err());

        let filed = r#"{"platform":"ios","warnings":[{"file":"B.swift","line":2,"message":"m","kind":"warning"}]}"#;
        assert_eq!(serde_json::from_str::<BuildInformation>(filed).unwrap().warnings().len(), 1);
    }

    #[test]
    fn test_exit_outcome_serialization() {
        for outcome in [ExitOutcome::Known(0), ExitOutcome::Known(65), ExitOutcome::Unknown, ExitOutcome::FailedWithErrors]
        {
            let json = serde_json::to_string(&outcome).unwrap();
            let deserialized: ExitOutcome = serde_json::from_str(&json).unwrap();
            assert_eq!(outcome, deserialized);
        }
    }

    #[test]
    fn test_exit_outcome_codes() {
        assert_eq!(ExitOutcome::Known(65).code(), 65);
        assert_eq!(ExitOutcome::Unknown.code(), UNKNOWN_EXIT_CODE);
        assert!(!ExitOutcome::Unknown.is_failure());
        assert!(!ExitOutcome::Known(0).is_failure());
        assert!(ExitOutcome::Known(65).is_failure());
        assert!(ExitOutcome::FailedWithErrors.is_failure());
    }
}
