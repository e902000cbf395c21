use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tax rates returned by the IBPT service for one code.
///
/// Each field is mapped explicitly onto its wire name. Keys absent from the
/// body decode to zero values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    #[serde(rename = "Codigo")]
    pub code: String,
    #[serde(rename = "UF")]
    pub uf: String,
    #[serde(rename = "EX")]
    pub ex: i32,
    #[serde(rename = "Descricao")]
    pub description: String,
    /// Federal rate for national goods, in percent
    #[serde(rename = "Nacional")]
    pub national: f64,
    #[serde(rename = "Estadual")]
    pub state: f64,
    /// Federal rate for imported goods, in percent
    #[serde(rename = "Importado")]
    pub imported: f64,
    #[serde(rename = "Municipal")]
    pub municipal: f64,
    #[serde(rename = "Tipo")]
    pub kind: String,
    #[serde(rename = "VigenciaInicio")]
    pub beginning_term: String,
    #[serde(rename = "VigenciaFim")]
    pub term_end: String,
    #[serde(rename = "Chave")]
    pub key: String,
    #[serde(rename = "Versao")]
    pub version: String,
    #[serde(rename = "Fonte")]
    pub source: String,
}

impl Response {
    /// Decodes a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(Error::Decode)
    }
}
