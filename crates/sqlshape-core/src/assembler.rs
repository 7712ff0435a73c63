//! Merges the probe's authoritative types with the inference engine's
//! nullability into the final [`StatementDescription`], per §4.5.

use crate::error::AnalyzerError;
use crate::inference::{Cardinality, InferredColumn};
use crate::probe::ProbeDescription;
use crate::statement::{OutputColumn, Parameter, RowCardinality, StatementDescription};

fn to_row_cardinality(cardinality: Cardinality) -> RowCardinality {
    match cardinality {
        Cardinality::Zero => RowCardinality::Zero,
        Cardinality::One => RowCardinality::One,
        Cardinality::ZeroOrOne => RowCardinality::ZeroOrOne,
        Cardinality::Many => RowCardinality::Many,
    }
}

/// Assembles the final [`StatementDescription`] from the preprocessor's
/// parameter names, the probe's authoritative types, and the inference
/// engine's nullability and cardinality.
///
/// Every parameter is reported `nullable: false` (§4.4.4): PostgreSQL
/// requires a bound value for each `$n` placeholder, so a parameter is
/// never "optional" regardless of where in the statement it appears.
/// Neither the AST nor a `DESCRIBE` reply expresses a nullable parameter
/// position, so there is nothing to selectively grant or withhold here —
/// catching the `UserSchemaError` case spec.md:204 describes (a parameter
/// position PostgreSQL itself reports as nullable) would need a probe
/// reply that carries per-parameter nullability, which this crate's
/// `ProbeConn` contract does not provide.
///
/// # Errors
///
/// Returns [`AnalyzerError::Probe`] if the probe's parameter or output
/// column count disagrees with what the analyzer expects, which would mean
/// the rewritten SQL sent to the backend didn't match what this crate
/// parsed.
pub fn assemble(
    parameter_names: &[String],
    probe: &ProbeDescription,
    cardinality: Cardinality,
    output_columns: Vec<InferredColumn>,
) -> Result<StatementDescription, AnalyzerError> {
    if probe.parameter_types.len() != parameter_names.len() {
        return Err(AnalyzerError::Probe(format!(
            "backend reported {} parameter(s) but the statement has {}",
            probe.parameter_types.len(),
            parameter_names.len()
        )));
    }

    let parameters = parameter_names
        .iter()
        .zip(probe.parameter_types.iter())
        .map(|(name, type_oid)| Parameter {
            name: name.clone(),
            type_oid: *type_oid,
            nullable: false,
        })
        .collect();

    if probe.output_columns.len() != output_columns.len() {
        return Err(AnalyzerError::Probe(format!(
            "backend reported {} output column(s) but inference found {}",
            probe.output_columns.len(),
            output_columns.len()
        )));
    }
    let columns = output_columns
        .into_iter()
        .zip(probe.output_columns.iter())
        .map(|(inferred, (probe_name, probe_oid))| OutputColumn {
            name: probe_name.clone(),
            type_oid: *probe_oid,
            nullable: inferred.nullable,
        })
        .collect();

    Ok(StatementDescription {
        parameters,
        cardinality: to_row_cardinality(cardinality),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_are_always_non_null_regardless_of_position() {
        let probe = ProbeDescription {
            parameter_types: vec![23, 25],
            output_columns: vec![],
        };
        let description = assemble(
            &["id".to_string(), "email".to_string()],
            &probe,
            Cardinality::Many,
            vec![],
        )
        .unwrap();
        assert!(!description.parameters[0].nullable);
        assert!(!description.parameters[1].nullable);
    }

    #[test]
    fn test_assemble_rejects_parameter_count_mismatch() {
        let probe = ProbeDescription {
            parameter_types: vec![23, 25],
            output_columns: vec![],
        };
        let err = assemble(&["only_one".to_string()], &probe, Cardinality::Many, vec![]).unwrap_err();
        assert!(matches!(err, AnalyzerError::Probe(_)));
    }

    #[test]
    fn test_assemble_rejects_output_column_count_mismatch() {
        let probe = ProbeDescription {
            parameter_types: vec![],
            output_columns: vec![("id".to_string(), 23)],
        };
        let err = assemble(&[], &probe, Cardinality::Many, vec![]).unwrap_err();
        assert!(matches!(err, AnalyzerError::Probe(_)));
    }
}
