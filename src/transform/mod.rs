//! Etapas de limpeza, na ordem em que são aplicadas:
//!
//! 1. [`schema`]: remove `link`, renomeia `date` para `issuance_date`
//! 2. [`release`]: descarta títulos não lançados
//! 3. [`dates`]: converte a data de lançamento
//! 4. [`nulls`]: "" vira ausência nas colunas de nota e classificação
//! 5. [`coerce`]: notas em texto viram números
//! 6. [`split`]: listas de desenvolvedores e gêneros viram colunas ranqueadas
//! 7. [`dedupe`]: garante (título, plataforma) único (opcional)

pub mod common;
pub mod schema;
pub mod release;
pub mod dates;
pub mod nulls;
pub mod coerce;
pub mod split;
pub mod dedupe;

use crate::config::CleaningConfig;
use crate::error::Result;
use common::CompositeTransformer;

/// Coluna da data de lançamento após a normalização do esquema
pub const DATE_COLUMN: &str = "issuance_date";

/// Colunas em que "" significa ausência
pub const NULLABLE_COLUMNS: [&str; 3] = ["meta_score", "user_score", "esrb_rating"];

/// Monta a cadeia completa de limpeza
pub fn cleaning_chain(config: &CleaningConfig) -> Result<CompositeTransformer> {
    let mut chain = CompositeTransformer::named("cleaning")
        .add(schema::schema_normalizer())
        .add(release::ReleaseFilter::new(DATE_COLUMN)?)
        .add(dates::DateParser::new(DATE_COLUMN))
        .add(nulls::NullNormalizer::new(&NULLABLE_COLUMNS))
        .add(
            coerce::TypeCoercer::new()
                .integer("meta_score")
                .decimal("user_score", 1),
        )
        .add(split::MultiValueSplitter::developers())
        .add(split::MultiValueSplitter::genres());

    if config.drop_duplicates {
        chain = chain.add(dedupe::DeduplicateTransform::by_release());
    }

    Ok(chain)
}
