use sqlx::PgPool;

use crate::ef::repo_types::{Ef, EfAttributes};

/// Hard cap on page size, mirrored by the HTTP boundary.
pub const MAX_PAGE_SIZE: i64 = 10;

const INSERT_EF: &str = r#"
    INSERT INTO emission_factors (
        line_type, element_id, structure, element_status, french_base_name,
        french_attribute_name, other_french_name, category_code, french_tags,
        french_unit, contributor, program, program_url, source, location,
        sub_location, creation_date, last_update_date, validity_period,
        uncertainty, reglementations, transparency, quality, quality_ter,
        quality_gr, quality_tir, quality_c, quality_p, quality_m,
        french_comment, emission_type, french_emission_type_name,
        unaggregated_total, co2f, ch4f, ch4b, n2o,
        additional_gaz_1, additional_gaz_value_1,
        additional_gaz_2, additional_gaz_value_2,
        additional_gaz_3, additional_gaz_value_3,
        additional_gaz_4, additional_gaz_value_4,
        additional_gaz_5, additional_gaz_value_5,
        other_greenhouse_gas, co2b, cat_1, cat_2, cat_3, cat_4, cat_5, cat_6,
        creation_date_format, update_date_format, validity_period_format,
        cat_id
    )
    VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
        $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
        $29, $30, $31, $32, $33, $34, $35, $36, $37, $38, $39, $40, $41,
        $42, $43, $44, $45, $46, $47, $48, $49, $50, $51, $52, $53, $54,
        $55, $56, $57, $58, $59
    )
    RETURNING *
"#;

impl Ef {
    pub async fn create(db: &PgPool, a: &EfAttributes) -> sqlx::Result<Ef> {
        sqlx::query_as::<_, Ef>(INSERT_EF)
            .bind(&a.line_type)
            .bind(a.element_id)
            .bind(&a.structure)
            .bind(&a.element_status)
            .bind(&a.french_base_name)
            .bind(&a.french_attribute_name)
            .bind(&a.other_french_name)
            .bind(&a.category_code)
            .bind(&a.french_tags)
            .bind(&a.french_unit)
            .bind(&a.contributor)
            .bind(&a.program)
            .bind(&a.program_url)
            .bind(&a.source)
            .bind(&a.location)
            .bind(&a.sub_location)
            .bind(&a.creation_date)
            .bind(&a.last_update_date)
            .bind(&a.validity_period)
            .bind(&a.uncertainty)
            .bind(&a.reglementations)
            .bind(&a.transparency)
            .bind(&a.quality)
            .bind(&a.quality_ter)
            .bind(&a.quality_gr)
            .bind(&a.quality_tir)
            .bind(&a.quality_c)
            .bind(&a.quality_p)
            .bind(&a.quality_m)
            .bind(&a.french_comment)
            .bind(&a.emission_type)
            .bind(&a.french_emission_type_name)
            .bind(a.unaggregated_total)
            .bind(a.co2f)
            .bind(a.ch4f)
            .bind(a.ch4b)
            .bind(a.n2o)
            .bind(&a.additional_gaz_1)
            .bind(a.additional_gaz_value_1)
            .bind(&a.additional_gaz_2)
            .bind(a.additional_gaz_value_2)
            .bind(&a.additional_gaz_3)
            .bind(a.additional_gaz_value_3)
            .bind(&a.additional_gaz_4)
            .bind(a.additional_gaz_value_4)
            .bind(&a.additional_gaz_5)
            .bind(a.additional_gaz_value_5)
            .bind(a.other_greenhouse_gas)
            .bind(a.co2b)
            .bind(&a.cat_1)
            .bind(&a.cat_2)
            .bind(&a.cat_3)
            .bind(&a.cat_4)
            .bind(&a.cat_5)
            .bind(&a.cat_6)
            .bind(&a.creation_date_format)
            .bind(&a.update_date_format)
            .bind(&a.validity_period_format)
            .bind(a.cat_id)
            .fetch_one(db)
            .await
    }

    /// Stable id ordering; the caller-facing limit cap lives in the DTO but
    /// is enforced here too so no call path can exceed it.
    pub async fn list(db: &PgPool, offset: i64, limit: i64) -> sqlx::Result<Vec<Ef>> {
        sqlx::query_as::<_, Ef>(
            r#"
            SELECT * FROM emission_factors
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.clamp(0, MAX_PAGE_SIZE))
        .bind(offset.max(0))
        .fetch_all(db)
        .await
    }

    pub async fn find_by_element_id(db: &PgPool, element_id: i64) -> sqlx::Result<Option<Ef>> {
        sqlx::query_as::<_, Ef>(
            r#"
            SELECT * FROM emission_factors
            WHERE element_id = $1
            LIMIT 1
            "#,
        )
        .bind(element_id)
        .fetch_optional(db)
        .await
    }
}
