//! # Modelo tipado
//!
//! [`GameRelease`] é a forma final de uma linha limpa: um título em uma
//! plataforma. [`ReleaseTable`] é a tabela consultável montada a partir das
//! linhas que sobreviveram à limpeza.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use crate::error::{Result, TransformError};
use crate::types::{DataRow, DataValue};

/// Um lançamento (título, plataforma) após a limpeza
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRelease {
    pub title: String,
    pub platform: String,
    pub issuance_date: NaiveDate,
    pub meta_score: Option<i64>,
    pub user_score: Option<f64>,
    pub esrb_rating: Option<String>,
    pub main_developer: Option<String>,
    pub sub_developer_1: Option<String>,
    pub sub_developer_2: Option<String>,
    pub main_genre: Option<String>,
    pub sub_genre_1: Option<String>,
    pub sub_genre_2: Option<String>,
    pub sub_genre_3: Option<String>,
}

impl GameRelease {
    /// Colunas da tabela limpa, na ordem de saída
    pub const COLUMNS: [&'static str; 13] = [
        "title",
        "platform",
        "issuance_date",
        "meta_score",
        "user_score",
        "esrb_rating",
        "main_developer",
        "sub_developer_1",
        "sub_developer_2",
        "main_genre",
        "sub_genre_1",
        "sub_genre_2",
        "sub_genre_3",
    ];

    /// Converte de volta para linha dinâmica (para os loaders)
    pub fn to_row(&self) -> DataRow {
        let mut row = DataRow::new();
        row.insert("title".to_string(), DataValue::from(self.title.as_str()));
        row.insert("platform".to_string(), DataValue::from(self.platform.as_str()));
        row.insert("issuance_date".to_string(), DataValue::Date(self.issuance_date));
        row.insert("meta_score".to_string(), DataValue::from(self.meta_score));
        row.insert("user_score".to_string(), DataValue::from(self.user_score));
        row.insert("esrb_rating".to_string(), DataValue::from(self.esrb_rating.clone()));
        row.insert("main_developer".to_string(), DataValue::from(self.main_developer.clone()));
        row.insert("sub_developer_1".to_string(), DataValue::from(self.sub_developer_1.clone()));
        row.insert("sub_developer_2".to_string(), DataValue::from(self.sub_developer_2.clone()));
        row.insert("main_genre".to_string(), DataValue::from(self.main_genre.clone()));
        row.insert("sub_genre_1".to_string(), DataValue::from(self.sub_genre_1.clone()));
        row.insert("sub_genre_2".to_string(), DataValue::from(self.sub_genre_2.clone()));
        row.insert("sub_genre_3".to_string(), DataValue::from(self.sub_genre_3.clone()));
        row
    }

    /// Desenvolvedores presentes, em ordem de ranking
    pub fn developers(&self) -> impl Iterator<Item = &str> {
        [&self.main_developer, &self.sub_developer_1, &self.sub_developer_2]
            .into_iter()
            .filter_map(|d| d.as_deref())
    }

    /// Gêneros presentes, em ordem de ranking
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        [&self.main_genre, &self.sub_genre_1, &self.sub_genre_2, &self.sub_genre_3]
            .into_iter()
            .filter_map(|g| g.as_deref())
    }
}

fn required_text(row: &DataRow, column: &str) -> Result<String> {
    match row.get(column) {
        Some(DataValue::String(s)) if !s.is_empty() => Ok(s.clone()),
        other => Err(TransformError::InvalidRecord(format!(
            "coluna {} obrigatória, encontrado {:?}",
            column, other
        ))
        .into()),
    }
}

fn optional_text(row: &DataRow, column: &str) -> Result<Option<String>> {
    match row.get(column) {
        None | Some(DataValue::Null) => Ok(None),
        Some(DataValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(TransformError::InvalidRecord(format!(
            "coluna {} deveria ser texto, encontrado {}",
            column,
            other.type_name()
        ))
        .into()),
    }
}

fn optional_typed<T>(
    row: &DataRow,
    column: &str,
    read: impl Fn(&DataValue) -> Option<T>,
) -> Result<Option<T>> {
    match row.get(column) {
        None | Some(DataValue::Null) => Ok(None),
        Some(value) => read(value).map(Some).ok_or_else(|| {
            TransformError::InvalidRecord(format!(
                "coluna {} com tipo inesperado {}",
                column,
                value.type_name()
            ))
            .into()
        }),
    }
}

impl TryFrom<&DataRow> for GameRelease {
    type Error = crate::error::ETLError;

    fn try_from(row: &DataRow) -> Result<Self> {
        let issuance_date = row
            .get("issuance_date")
            .and_then(DataValue::as_date)
            .ok_or_else(|| {
                TransformError::InvalidRecord(format!(
                    "issuance_date ausente ou não convertida: {:?}",
                    row.get("issuance_date")
                ))
            })?;

        Ok(Self {
            title: required_text(row, "title")?,
            platform: required_text(row, "platform")?,
            issuance_date,
            meta_score: optional_typed(row, "meta_score", DataValue::as_integer)?,
            user_score: optional_typed(row, "user_score", DataValue::as_float)?,
            esrb_rating: optional_text(row, "esrb_rating")?,
            main_developer: optional_text(row, "main_developer")?,
            sub_developer_1: optional_text(row, "sub_developer_1")?,
            sub_developer_2: optional_text(row, "sub_developer_2")?,
            main_genre: optional_text(row, "main_genre")?,
            sub_genre_1: optional_text(row, "sub_genre_1")?,
            sub_genre_2: optional_text(row, "sub_genre_2")?,
            sub_genre_3: optional_text(row, "sub_genre_3")?,
        })
    }
}

/// Tabela limpa, consultável por chave e por alguns recortes comuns
#[derive(Debug, Clone, Default)]
pub struct ReleaseTable {
    releases: Vec<GameRelease>,
    index: HashMap<(String, String), usize>,
}

impl ReleaseTable {
    /// Monta a tabela; uma chave (título, plataforma) repetida é erro
    pub fn new(releases: Vec<GameRelease>) -> Result<Self> {
        let mut index = HashMap::with_capacity(releases.len());
        for (position, release) in releases.iter().enumerate() {
            let key = (release.title.clone(), release.platform.clone());
            if index.insert(key, position).is_some() {
                return Err(TransformError::InvalidRecord(format!(
                    "lançamento duplicado: {} / {}",
                    release.title, release.platform
                ))
                .into());
            }
        }
        Ok(Self { releases, index })
    }

    /// Monta a tabela a partir das linhas limpas
    pub fn from_rows(rows: &[DataRow]) -> Result<Self> {
        let releases = rows
            .iter()
            .map(GameRelease::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(releases)
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRelease> {
        self.releases.iter()
    }

    /// Busca pela chave composta
    pub fn get(&self, title: &str, platform: &str) -> Option<&GameRelease> {
        self.index
            .get(&(title.to_string(), platform.to_string()))
            .and_then(|&position| self.releases.get(position))
    }

    pub fn by_platform<'a>(&'a self, platform: &'a str) -> impl Iterator<Item = &'a GameRelease> + 'a {
        self.releases.iter().filter(move |r| r.platform == platform)
    }

    /// Lançamentos em que o desenvolvedor aparece em qualquer posição
    pub fn by_developer<'a>(&'a self, developer: &'a str) -> impl Iterator<Item = &'a GameRelease> + 'a {
        self.releases
            .iter()
            .filter(move |r| r.developers().any(|d| d == developer))
    }

    pub fn released_in(&self, year: i32) -> impl Iterator<Item = &GameRelease> + '_ {
        self.releases
            .iter()
            .filter(move |r| r.issuance_date.year() == year)
    }

    /// Linhas dinâmicas, prontas para os loaders
    pub fn to_rows(&self) -> Vec<DataRow> {
        self.releases.iter().map(GameRelease::to_row).collect()
    }
}

impl<'a> IntoIterator for &'a ReleaseTable {
    type Item = &'a GameRelease;
    type IntoIter = std::slice::Iter<'a, GameRelease>;

    fn into_iter(self) -> Self::IntoIter {
        self.releases.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::release;
    use super::*;

    fn odyssey() -> GameRelease {
        GameRelease {
            meta_score: Some(97),
            user_score: Some(8.5),
            esrb_rating: Some("E10+".to_string()),
            main_developer: Some("Nintendo EPD".to_string()),
            main_genre: Some("Platform".to_string()),
            ..release("Super Mario Odyssey", "Switch", (2017, 10, 27))
        }
    }

    #[test]
    fn test_row_round_trip() {
        let original = odyssey();
        let row = original.to_row();
        assert_eq!(row.len(), GameRelease::COLUMNS.len());
        assert_eq!(GameRelease::try_from(&row).unwrap(), original);
    }

    #[test]
    fn test_try_from_rejects_unparsed_date() {
        let mut row = odyssey().to_row();
        row.insert("issuance_date".to_string(), DataValue::from("October 27, 2017"));
        assert!(GameRelease::try_from(&row).is_err());
    }

    #[test]
    fn test_try_from_rejects_untyped_score() {
        let mut row = odyssey().to_row();
        row.insert("meta_score".to_string(), DataValue::from("97"));
        assert!(GameRelease::try_from(&row).is_err());
    }

    #[test]
    fn test_try_from_ignores_metadata_columns() {
        let mut row = odyssey().to_row();
        row.insert("source_line".to_string(), DataValue::Integer(2));
        row.remove("sub_genre_3");
        assert_eq!(GameRelease::try_from(&row).unwrap(), odyssey());
    }

    #[test]
    fn test_table_queries() {
        let mut halo = release("Halo", "Xbox", (2001, 11, 15));
        halo.main_developer = Some("Bungie".to_string());
        let mut halo_pc = release("Halo", "PC", (2003, 9, 30));
        halo_pc.sub_developer_1 = Some("Bungie".to_string());

        let table = ReleaseTable::new(vec![halo, halo_pc, odyssey()]).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("Halo", "PC").unwrap().issuance_date.year(), 2003);
        assert!(table.get("Halo", "Switch").is_none());
        assert_eq!(table.by_platform("Xbox").count(), 1);
        assert_eq!(table.by_developer("Bungie").count(), 2);
        assert_eq!(table.released_in(2017).count(), 1);
        assert_eq!(table.to_rows().len(), 3);
    }

    #[test]
    fn test_table_rejects_duplicate_key() {
        let result = ReleaseTable::new(vec![
            release("Halo", "Xbox", (2001, 11, 15)),
            release("Halo", "Xbox", (2001, 11, 15)),
        ]);
        assert!(result.is_err());
    }
}
