use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Emission factor attributes as supplied by callers. Flat bag of scalar
/// fields mirroring the Base Carbone export; no relations to other entities.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EfAttributes {
    pub line_type: String,
    pub element_id: i64,
    pub structure: String,
    pub element_status: String,
    pub french_base_name: String,
    pub french_attribute_name: Option<String>,
    pub other_french_name: Option<String>,
    pub category_code: String,
    pub french_tags: Option<String>,
    pub french_unit: Option<String>,
    pub contributor: Option<String>,
    pub program: Option<String>,
    pub program_url: Option<String>,
    pub source: Option<String>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub creation_date: Option<String>,
    pub last_update_date: Option<String>,
    pub validity_period: Option<String>,
    pub uncertainty: Option<String>,
    pub reglementations: Option<String>,
    pub transparency: Option<String>,
    pub quality: Option<String>,
    pub quality_ter: Option<String>,
    pub quality_gr: Option<String>,
    pub quality_tir: Option<String>,
    pub quality_c: Option<String>,
    pub quality_p: Option<String>,
    pub quality_m: Option<String>,
    pub french_comment: Option<String>,
    pub emission_type: Option<String>,
    pub french_emission_type_name: Option<String>,
    pub unaggregated_total: Option<f64>,
    pub co2f: Option<f64>,
    pub ch4f: Option<f64>,
    pub ch4b: Option<f64>,
    pub n2o: Option<f64>,
    pub additional_gaz_1: Option<String>,
    pub additional_gaz_value_1: Option<f64>,
    pub additional_gaz_2: Option<String>,
    pub additional_gaz_value_2: Option<f64>,
    pub additional_gaz_3: Option<String>,
    pub additional_gaz_value_3: Option<f64>,
    pub additional_gaz_4: Option<String>,
    pub additional_gaz_value_4: Option<f64>,
    pub additional_gaz_5: Option<String>,
    pub additional_gaz_value_5: Option<f64>,
    pub other_greenhouse_gas: Option<f64>,
    pub co2b: Option<f64>,
    pub cat_1: String,
    pub cat_2: String,
    pub cat_3: Option<String>,
    pub cat_4: Option<String>,
    pub cat_5: Option<String>,
    pub cat_6: Option<String>,
    pub creation_date_format: Option<String>,
    pub update_date_format: Option<String>,
    pub validity_period_format: Option<String>,
    pub cat_id: i64,
}

/// Stored emission factor row: caller attributes plus the generated id.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ef {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attributes: EfAttributes,
}

/// Minimal valid attribute set for tests; only required columns filled.
#[cfg(test)]
pub(crate) fn sample_attributes(element_id: i64) -> EfAttributes {
    serde_json::from_value(serde_json::json!({
        "line_type": "Elément",
        "element_id": element_id,
        "structure": "1 ligne",
        "element_status": "Valide générique",
        "french_base_name": "Acier",
        "category_code": "Achats de biens",
        "cat_1": "Achats de biens",
        "cat_2": "Métaux",
        "cat_id": 7,
    }))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_none() {
        let attrs = sample_attributes(20001);
        assert!(attrs.french_unit.is_none());
        assert!(attrs.co2f.is_none());
        assert_eq!(attrs.element_id, 20001);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result: Result<EfAttributes, _> = serde_json::from_value(serde_json::json!({
            "line_type": "Elément"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn row_serializes_flat() {
        let ef = Ef {
            id: 42,
            attributes: sample_attributes(20001),
        };
        let value = serde_json::to_value(&ef).unwrap();
        // `attributes` is flattened into the top-level object
        assert_eq!(value["id"], 42);
        assert_eq!(value["element_id"], 20001);
        assert!(value.get("attributes").is_none());
    }
}
