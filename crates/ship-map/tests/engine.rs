use ship_map::{ColumnMapper, MappingOptions};
use ship_model::{CanonicalSchema, CellValue, FieldDef, SemanticType};

fn shipment_schema() -> CanonicalSchema {
    CanonicalSchema::new(
        "shipment",
        vec![
            FieldDef::new("trackingId", SemanticType::identifier(None))
                .required()
                .with_aliases(["tracking number", "awb"]),
            FieldDef::new("shipDate", SemanticType::Date).required(),
            FieldDef::new("origin", SemanticType::String).required(),
            FieldDef::new("destination", SemanticType::String).required(),
            FieldDef::new("weight", SemanticType::Decimal),
            FieldDef::new(
                "status",
                SemanticType::enumeration(["Pending", "InTransit", "Delivered"]),
            ),
        ],
    )
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

#[test]
fn complete_header_maps_every_field_above_threshold() {
    let mapper = ColumnMapper::new(MappingOptions::default());
    let header = labels(&["Tracking #", "Ship Dt", "Origin", "Dest", "Wt (kg)", "Status"]);
    let mapping = mapper.map(&header, &shipment_schema());

    assert!(mapping.unmapped_fields.is_empty(), "{mapping:?}");
    assert!(mapping.unmapped_columns.is_empty());
    for assignment in &mapping.assignments {
        assert!(assignment.confidence >= 0.75, "{assignment:?}");
    }
    assert_eq!(mapping.column_index("weight"), Some(4));
    assert_eq!(mapping.column_index("destination"), Some(3));
}

#[test]
fn mapping_is_a_function_of_its_inputs() {
    let mapper = ColumnMapper::default();
    let header = labels(&["AWB", "Date Shipped", "From", "To", "Gross Wt", "State", "Remarks"]);
    let first = mapper.map(&header, &shipment_schema());
    let second = mapper.map(&header, &shipment_schema());
    assert_eq!(first, second);

    let mut columns: Vec<usize> = first
        .assignments
        .iter()
        .map(|assignment| assignment.column_index)
        .collect();
    columns.sort_unstable();
    columns.dedup();
    assert_eq!(columns.len(), first.assignments.len());
}

#[test]
fn missing_tracking_column_is_reported_as_missing_required() {
    let mapper = ColumnMapper::default();
    let header = labels(&["Ship Date", "Origin", "Destination", "Weight"]);
    let mapping = mapper.map(&header, &shipment_schema());
    assert_eq!(mapping.missing_required(&shipment_schema()), vec!["trackingId"]);
}

#[test]
fn dirty_values_never_lower_a_name_match() {
    let schema = CanonicalSchema::new(
        "w",
        vec![FieldDef::new("weight", SemanticType::Decimal).required()],
    );
    let header = labels(&["Wt (kg)"]);
    let mapper = ColumnMapper::default();
    let clean = mapper.map(&header, &schema);

    let samples: Vec<Vec<CellValue>> = ["12 kg", "13 kg", "n/a", "heavy", "tbc"]
        .iter()
        .map(|value| vec![CellValue::text(*value)])
        .collect();
    let dirty = mapper.map_with_samples(&header, &schema, &samples);

    let assignment = dirty.assignment_for("weight").expect("still mapped");
    assert_eq!(assignment.sniff_ratio, Some(0.0));
    assert_eq!(
        assignment.confidence,
        clean.assignment_for("weight").expect("mapped").confidence
    );
    assert!(dirty.missing_required(&schema).is_empty());
}

#[test]
fn options_load_from_toml_with_defaults() {
    let options: MappingOptions =
        toml::from_str("acceptance_threshold = 0.8\n").expect("parse options");
    assert_eq!(options.acceptance_threshold, 0.8);
    assert_eq!(options.sample_size, 20);
}
