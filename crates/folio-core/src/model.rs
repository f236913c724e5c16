//! Extractor output model
//!
//! Mirrors the JSON the upstream extraction pipeline produces. Key casing
//! and naming is whatever the extractor happened to emit, so every field
//! tolerates the known aliases. Percentages stay raw here: parsing happens
//! in the engine, where a malformed value can be warned about with the
//! holder it belongs to.

use serde::{Deserialize, Deserializer, Serialize};

use crate::holder::HolderKey;

/// Raw percentage exactly as extracted: a JSON number or free text.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RawPercent {
    Number(f64),
    Text(String),
}

/// Spouse reference attached to a party.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Spouse {
    #[serde(default, alias = "Name", alias = "Nome")]
    pub name: Option<String>,
    #[serde(default, rename = "taxId", alias = "CPF", alias = "cpf")]
    pub tax_id: Option<String>,
}

/// Agent or beneficiary of an action.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Party {
    #[serde(default, alias = "Name", alias = "Nome")]
    pub name: String,
    #[serde(default, rename = "taxId", alias = "CPF", alias = "cpf")]
    pub tax_id: Option<String>,
    /// Percentage an agent transferred, exactly as extracted.
    #[serde(
        default,
        alias = "Percentage_Transferred",
        alias = "percentageTransferred"
    )]
    pub percentage_transferred: Option<RawPercent>,
    /// Percentage a beneficiary received, exactly as extracted.
    #[serde(default, alias = "Percentage_Received", alias = "percentageReceived")]
    pub percentage_received: Option<RawPercent>,
    #[serde(default, alias = "Spouse", deserialize_with = "lenient_spouse")]
    pub spouse: Option<Spouse>,
}

impl Party {
    /// Ledger key for this party.
    pub fn key(&self) -> HolderKey {
        HolderKey::derive(self.tax_id.as_deref(), &self.name)
    }
}

/// One recorded legal event.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionRecord {
    #[serde(default, alias = "Date", alias = "Data")]
    pub date: String,
    /// Free-text type label; classified by the engine.
    #[serde(
        default,
        rename = "actionType",
        alias = "Action",
        alias = "Tipo da Ação",
        alias = "typeLabel"
    )]
    pub label: String,
    #[serde(default, alias = "Agents")]
    pub agents: Vec<Party>,
    #[serde(default, alias = "Beneficiaries")]
    pub beneficiaries: Vec<Party>,
    #[serde(default, alias = "Additional_Info", alias = "additionalInfo")]
    pub notes: Option<String>,
}

/// A full extraction document for one registry folio.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegistryExtract {
    #[serde(default, rename = "registrationId", alias = "Matricula_Number")]
    pub registration_id: Option<String>,
    #[serde(default, rename = "propertyName", alias = "Property_Name")]
    pub property_name: Option<String>,
    #[serde(default, alias = "Actions")]
    pub actions: Vec<ActionRecord>,
}

/// Input accepted by the engine: a full document or a bare action list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ExtractInput {
    Document(RegistryExtract),
    Actions(Vec<ActionRecord>),
}

impl From<ExtractInput> for RegistryExtract {
    fn from(input: ExtractInput) -> Self {
        match input {
            ExtractInput::Document(doc) => doc,
            ExtractInput::Actions(actions) => RegistryExtract {
                actions,
                ..RegistryExtract::default()
            },
        }
    }
}

/// The extractor emits spouses as objects, sentinel strings or garbage;
/// anything that is not an object with at least one usable field degrades
/// to absent.
fn lenient_spouse<'de, D>(deserializer: D) -> Result<Option<Spouse>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_object() {
        if let Ok(spouse) = serde_json::from_value::<Spouse>(value) {
            if spouse.name.is_some() || spouse.tax_id.is_some() {
                return Ok(Some(spouse));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_extractor_aliases() {
        let json = r#"{
            "Date": "01/02/2003",
            "Action": "Venda",
            "Agents": [{"Name": "A", "CPF": "1", "Percentage_Transferred": "50%"}],
            "Beneficiaries": [{"Name": "B", "Percentage_Received": 0.5}],
            "Additional_Info": "com reserva de usufruto"
        }"#;
        let action: ActionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(action.date, "01/02/2003");
        assert_eq!(action.label, "Venda");
        assert_eq!(action.agents[0].tax_id.as_deref(), Some("1"));
        assert_eq!(
            action.agents[0].percentage_transferred,
            Some(RawPercent::Text("50%".to_string()))
        );
        assert_eq!(
            action.beneficiaries[0].percentage_received,
            Some(RawPercent::Number(0.5))
        );
        assert_eq!(action.notes.as_deref(), Some("com reserva de usufruto"));
    }

    #[test]
    fn test_action_camel_case_aliases() {
        let json = r#"{
            "date": "2003-02-01",
            "actionType": "sale",
            "agents": [{"name": "A", "taxId": "9", "percentageTransferred": "1/2"}]
        }"#;
        let action: ActionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(action.label, "sale");
        assert_eq!(action.agents[0].tax_id.as_deref(), Some("9"));
        assert!(action.beneficiaries.is_empty());
    }

    #[test]
    fn test_spouse_object_is_kept() {
        let json = r#"{"Name": "A", "Spouse": {"Name": "B", "CPF": "2"}}"#;
        let party: Party = serde_json::from_str(json).unwrap();
        let spouse = party.spouse.unwrap();
        assert_eq!(spouse.name.as_deref(), Some("B"));
        assert_eq!(spouse.tax_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_malformed_spouse_degrades_to_absent() {
        for json in [
            r#"{"Name": "A", "Spouse": "Não informado"}"#,
            r#"{"Name": "A", "Spouse": 42}"#,
            r#"{"Name": "A", "Spouse": {}}"#,
            r#"{"Name": "A"}"#,
        ] {
            let party: Party = serde_json::from_str(json).unwrap();
            assert!(party.spouse.is_none(), "input: {json}");
        }
    }

    #[test]
    fn test_extract_input_accepts_bare_action_list() {
        let json = r#"[{"Action": "Venda", "Date": "01/01/2000"}]"#;
        let input: ExtractInput = serde_json::from_str(json).unwrap();
        let extract = RegistryExtract::from(input);
        assert!(extract.registration_id.is_none());
        assert_eq!(extract.actions.len(), 1);
    }

    #[test]
    fn test_extract_input_accepts_document() {
        let json = r#"{
            "Matricula_Number": "12345",
            "Property_Name": "Fazenda Esperança",
            "Actions": []
        }"#;
        let input: ExtractInput = serde_json::from_str(json).unwrap();
        let extract = RegistryExtract::from(input);
        assert_eq!(extract.registration_id.as_deref(), Some("12345"));
        assert_eq!(extract.property_name.as_deref(), Some("Fazenda Esperança"));
    }
}
