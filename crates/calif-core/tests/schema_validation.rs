//! Persisted records validate against their exported JSON Schema.

use std::collections::BTreeSet;

use calif_core::enums::GradingMode;
use calif_core::records::*;
use chrono::Utc;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! validates_against_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "reload changed {}", stringify!($ty));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

validates_against_schema!(
    team_mapping_file,
    TeamMapping,
    TeamMapping {
        group: "G - Submitted files".into(),
        individual: true,
        default_team_id: 1,
        students: vec![
            TeamMember {
                name: "Ana Ruiz".into(),
                team_id: 1,
            },
            TeamMember {
                name: "Íñigo Peña".into(),
                team_id: 3,
            },
        ],
    }
);

validates_against_schema!(
    progress_file,
    ProgressState,
    ProgressState {
        graded_files: BTreeSet::from(["Lab_Ana Ruiz.pdf".to_string()]),
        last_index: 1,
        timestamp: Some(Utc::now()),
    }
);

validates_against_schema!(
    individual_manifest,
    SyncManifest,
    SyncManifest {
        group: "G - Submitted files".into(),
        task: "2. Tarea".into(),
        mode: GradingMode::Individual,
        source_root: "/subs/G - Submitted files".into(),
        dest_root: "/cal/G - Submitted files/2. Tarea".into(),
        students: vec![CopyRecord::Student(StudentCopy {
            student: "Ana Ruiz".into(),
            team_id: 1,
            source: "/subs/G - Submitted files/Ana Ruiz/2. Tarea/entrega.pdf".into(),
            dest: "/cal/G - Submitted files/2. Tarea/Tarea_Ana Ruiz.pdf".into(),
        })],
        generated_at: Utc::now(),
    }
);

validates_against_schema!(
    team_manifest,
    SyncManifest,
    SyncManifest {
        group: "G - Submitted files".into(),
        task: "1. Lab".into(),
        mode: GradingMode::Teams,
        source_root: "/subs/G - Submitted files".into(),
        dest_root: "/cal/G - Submitted files/1. Lab".into(),
        students: vec![CopyRecord::Team(TeamCopy {
            team_id: 1,
            chosen_from: "B".into(),
            source: "/subs/G - Submitted files/B/1. Lab/Version 2/lab.pdf".into(),
            dest: "/cal/G - Submitted files/1. Lab/Lab_Equipo_1.pdf".into(),
        })],
        generated_at: Utc::now(),
    }
);

#[test]
fn manifest_mode_uses_legacy_labels() {
    let value = serde_json::to_value(GradingMode::Teams).unwrap();
    assert_eq!(value, serde_json::json!("equipos"));
}
