//! Normalização do esquema bruto: remove colunas sem uso analítico e
//! dá nomes definitivos às que sobram.

use crate::transform::common::{CompositeTransformer, RemoveColumnsTransform, RenameColumnsTransform};

/// Colunas descartadas logo após a carga
pub const DROPPED_COLUMNS: [&str; 1] = ["link"];

/// Renomeações aplicadas (nome bruto, nome final)
pub const RENAMED_COLUMNS: [(&str, &str); 1] = [("date", "issuance_date")];

/// Etapa de normalização do esquema, como uma composição de remoção e renomeação
pub fn schema_normalizer() -> CompositeTransformer {
    let mappings = RENAMED_COLUMNS
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

    CompositeTransformer::named("schema_normalizer")
        .add(RemoveColumnsTransform::new(
            DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ))
        .add(RenameColumnsTransform::new(mappings))
}
