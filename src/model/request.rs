use crate::error::ValidationError;

/// Parameters of a single tax-rate lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    /// API token issued by IBPT
    pub token: String,
    /// CNPJ of the company performing the lookup
    pub cnpj: String,
    /// NCM (products) or NBS/LC116 (services) code
    pub code: String,
    /// State code; may be empty for codes of up to two characters
    pub uf: String,
    /// Fiscal exception number
    pub ex: i32,
    pub internal_code: String,
    pub description: String,
    pub unit_measurement: String,
    pub value: f64,
    pub gtin: String,
}

impl Request {
    /// Returns an error if the request is not well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(Some(self))
    }

    /// Query parameters sent to the lookup endpoint, in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("token", self.token.clone()),
            ("cnpj", self.cnpj.clone()),
            ("codigo", self.code.clone()),
            ("uf", self.uf.clone()),
            ("ex", self.ex.to_string()),
            ("codigoInterno", self.internal_code.clone()),
            ("unidadeMedida", self.unit_measurement.clone()),
            ("descricao", self.description.clone()),
            ("valor", format_value(self.value)),
            ("gtin", self.gtin.clone()),
        ]
    }
}

/// Validates an optional request, failing with [`ValidationError::MissingPayload`] on `None`.
pub fn validate(request: Option<&Request>) -> Result<(), ValidationError> {
    let Some(request) = request else {
        return Err(ValidationError::MissingPayload);
    };

    if request.token.is_empty() {
        return Err(ValidationError::MissingToken);
    }

    if request.cnpj.is_empty() {
        return Err(ValidationError::MissingRegistrationId);
    }

    if request.code.is_empty() {
        return Err(ValidationError::MissingCode);
    }

    if request.uf.is_empty() && request.code.chars().count() > 2 {
        return Err(ValidationError::MissingJurisdiction);
    }

    if request.description.is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    if request.unit_measurement.is_empty() {
        return Err(ValidationError::MissingUnitMeasurement);
    }

    Ok(())
}

/// Monetary values travel rounded to two decimal places.
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// Hides all but the edges of a secret for log output.
pub(crate) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
