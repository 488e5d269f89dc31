//! # Multi-value Splitter
//!
//! Campos como `developers` e `genres` chegam como listas serializadas em
//! texto: `"['Nintendo', 'Game Freak']"`. Esta etapa remove os artefatos de
//! serialização e distribui os itens em um número fixo de colunas ranqueadas:
//!
//! | posição | coluna            |
//! |---------|-------------------|
//! | 1       | `main_<campo>`    |
//! | 2..N    | `sub_<campo>_1..` |
//!
//! Regras:
//! - os itens são separados pela sequência literal `", "` (vírgula + espaço);
//!   uma vírgula sem espaço não separa itens;
//! - o primeiro item ainda é cortado na primeira vírgula, mesmo sem espaço;
//! - itens além de N são descartados;
//! - posições sem item, ou com item vazio (ex.: `"A, "`), ficam ausentes;
//!   as demais mantêm a posição, então `", B"` deixa `main_` ausente e
//!   `B` em `sub_<campo>_1`;
//! - campo vazio ou ausente deixa todas as posições ausentes.
//!
//! Limitação conhecida: um nome que contenha `", "` é dividido em dois itens.

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{DataRow, DataValue};
use crate::traits::Transformer;

/// Caracteres de serialização de lista removidos antes da divisão
pub const LIST_ARTIFACTS: [char; 3] = ['[', ']', '\''];

/// Separador entre itens
pub const ITEM_SEPARATOR: &str = ", ";

/// Posições para listas de desenvolvedores
pub const DEVELOPER_SLOTS: usize = 3;

/// Posições para listas de gêneros
pub const GENRE_SLOTS: usize = 4;

/// Remove todas as ocorrências de `[`, `]` e `'`
pub fn strip_list_artifacts(raw: &str) -> String {
    raw.chars().filter(|c| !LIST_ARTIFACTS.contains(c)).collect()
}

/// Iterador sobre os itens de uma lista separada por `", "`
#[derive(Debug, Clone)]
pub struct ListTokens<'a> {
    rest: Option<&'a str>,
}

impl<'a> ListTokens<'a> {
    pub fn new(input: &'a str) -> Self {
        let rest = if input.is_empty() { None } else { Some(input) };
        Self { rest }
    }
}

impl<'a> Iterator for ListTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.rest?;
        match current.split_once(ITEM_SEPARATOR) {
            Some((token, tail)) => {
                self.rest = Some(tail);
                Some(token)
            }
            None => {
                self.rest = None;
                Some(current)
            }
        }
    }
}

/// Distribui um campo de lista bruto em exatamente `arity` posições
pub fn split_ranked(raw: &str, arity: usize) -> Vec<Option<String>> {
    let cleaned = strip_list_artifacts(raw);

    let mut slots: Vec<Option<String>> = ListTokens::new(&cleaned)
        .take(arity)
        .enumerate()
        .map(|(position, token)| {
            let token = if position == 0 {
                token.split(',').next().unwrap_or(token)
            } else {
                token
            };
            (!token.is_empty()).then(|| token.to_string())
        })
        .collect();

    slots.resize(arity, None);
    slots
}

/// Nomes das colunas ranqueadas para um campo: `main_x`, `sub_x_1`, ...
pub fn slot_columns(field: &str, arity: usize) -> Vec<String> {
    (0..arity)
        .map(|position| match position {
            0 => format!("main_{}", field),
            n => format!("sub_{}_{}", field, n),
        })
        .collect()
}

/// Etapa que substitui um campo de lista pelas suas colunas ranqueadas
///
/// A coluna original é removida. Se ela já não existir (tabela limpa), as
/// colunas ranqueadas presentes são mantidas.
#[derive(Debug, Clone)]
pub struct MultiValueSplitter {
    source: String,
    columns: Vec<String>,
}

impl MultiValueSplitter {
    /// `source` é a coluna bruta, `field` o nome usado nas colunas geradas
    pub fn new(source: impl Into<String>, field: &str, arity: usize) -> Self {
        Self {
            source: source.into(),
            columns: slot_columns(field, arity),
        }
    }

    /// Desenvolvedores: `developers` → `main_developer`, `sub_developer_1..2`
    pub fn developers() -> Self {
        Self::new("developers", "developer", DEVELOPER_SLOTS)
    }

    /// Gêneros: `genres` → `main_genre`, `sub_genre_1..3`
    pub fn genres() -> Self {
        Self::new("genres", "genre", GENRE_SLOTS)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn split_row(&self, mut row: DataRow) -> DataRow {
        let slots = match row.remove(&self.source) {
            Some(DataValue::Null) => vec![None; self.columns.len()],
            Some(value) => {
                let raw = value.as_string().unwrap_or_default();
                split_ranked(&raw, self.columns.len())
            }
            None => {
                for column in &self.columns {
                    row.entry(column.clone()).or_insert(DataValue::Null);
                }
                return row;
            }
        };

        for (column, slot) in self.columns.iter().zip(slots) {
            row.insert(column.clone(), DataValue::from(slot));
        }
        row
    }
}

#[async_trait]
impl Transformer for MultiValueSplitter {
    async fn transform(&self, data: Vec<DataRow>) -> Result<Vec<DataRow>> {
        Ok(data.into_iter().map(|row| self.split_row(row)).collect())
    }

    fn name(&self) -> &str {
        "multi_value_splitter"
    }
}
