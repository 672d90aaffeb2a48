//! Compact builder for catalog declarations

use crate::schema::{
    FieldDef, FieldType, IntervalSpec, KindRole, KindSchema, RefColumn, Reference, SchemaError,
    SchemaResult, ValueRange,
};

use super::RecordKind;

/// Two-letter upper-case country code
pub(crate) const ISO_PATTERN: &str = "^[A-Z]{2}$";

pub(crate) struct KindBuilder {
    schema: KindSchema,
    errors: Vec<String>,
}

impl KindBuilder {
    pub(crate) fn new(kind: RecordKind, role: KindRole) -> Self {
        Self {
            schema: KindSchema::new(kind.name(), role),
            errors: Vec::new(),
        }
    }

    pub(crate) fn describe(mut self, text: &str) -> Self {
        self.schema.description = Some(text.to_string());
        self
    }

    fn key_field(mut self, def: FieldDef) -> Self {
        self.schema.key.push(def.name.clone());
        self.schema.fields.push(def);
        self
    }

    pub(crate) fn key_text(self, name: &str) -> Self {
        self.key_field(FieldDef::required(name, FieldType::Text))
    }

    pub(crate) fn key_int(self, name: &str) -> Self {
        self.key_field(FieldDef::required(name, FieldType::Int))
    }

    pub(crate) fn key_float(self, name: &str) -> Self {
        self.key_field(FieldDef::required(name, FieldType::Float))
    }

    /// `(iso, id)` under a given country-code field name
    pub(crate) fn key_iso_id(self, iso: &str, id: &str) -> Self {
        self.key_field(FieldDef::required(iso, FieldType::Text).with_pattern(ISO_PATTERN))
            .key_int(id)
    }

    pub(crate) fn profile_key(self) -> Self {
        self.key_iso_id("iso", "id")
    }

    pub(crate) fn horizon_key(self) -> Self {
        self.profile_key().key_int("hori")
    }

    fn optional(mut self, names: &[&str], field_type: FieldType) -> Self {
        for name in names {
            self.schema.fields.push(FieldDef::optional(*name, field_type.clone()));
        }
        self
    }

    pub(crate) fn text(self, names: &[&str]) -> Self {
        self.optional(names, FieldType::Text)
    }

    pub(crate) fn int(self, names: &[&str]) -> Self {
        self.optional(names, FieldType::Int)
    }

    pub(crate) fn float(self, names: &[&str]) -> Self {
        self.optional(names, FieldType::Float)
    }

    pub(crate) fn date(self, names: &[&str]) -> Self {
        self.optional(names, FieldType::Date)
    }

    pub(crate) fn required_spectrum(mut self, name: &str, start_nm: u32, end_nm: u32, step_nm: u32) -> Self {
        self.schema.fields.push(FieldDef::required(
            name,
            FieldType::Spectrum {
                start_nm,
                end_nm,
                step_nm,
            },
        ));
        self
    }

    fn update(mut self, names: &[&str], f: impl Fn(&mut FieldDef)) -> Self {
        for name in names {
            match self.schema.fields.iter_mut().find(|d| d.name == *name) {
                Some(def) => f(def),
                None => self.errors.push(format!("field '{}' is not declared", name)),
            }
        }
        self
    }

    pub(crate) fn range(self, names: &[&str], range: ValueRange) -> Self {
        self.update(names, |def| def.range = Some(range))
    }

    pub(crate) fn pattern(self, names: &[&str], pattern: &str) -> Self {
        self.update(names, |def| def.pattern = Some(pattern.to_string()))
    }

    pub(crate) fn indexed(self, names: &[&str]) -> Self {
        self.update(names, |def| def.indexed = true)
    }

    pub(crate) fn owner(mut self, target: RecordKind, fields: &[&str]) -> Self {
        self.schema.references.push(Reference::owner(target.name(), fields));
        self
    }

    pub(crate) fn link(mut self, target: RecordKind, fields: &[&str]) -> Self {
        self.schema.references.push(Reference::link(target.name(), fields));
        self
    }

    /// Code fields resolved against a vocabulary keyed by the same tuple
    pub(crate) fn codes(mut self, target: RecordKind, fields: &[&str]) -> Self {
        let columns = fields.iter().map(|f| RefColumn::Field((*f).to_string())).collect();
        self.schema.references.push(Reference::vocabulary(target.name(), columns));
        self
    }

    /// Code field resolved against an `(attribute, value)` vocabulary,
    /// using the field name as the attribute
    pub(crate) fn attribute_code(mut self, target: RecordKind, field: &str) -> Self {
        self.schema.references.push(Reference::vocabulary(
            target.name(),
            vec![RefColumn::Const(field.to_string()), RefColumn::Field(field.to_string())],
        ));
        self
    }

    pub(crate) fn interval(mut self, scope: &[&str], top: &str, bot: &str) -> Self {
        self.schema.interval = Some(IntervalSpec {
            scope: scope.iter().map(|s| (*s).to_string()).collect(),
            top: top.to_string(),
            bot: bot.to_string(),
        });
        self
    }

    pub(crate) fn build(self) -> SchemaResult<KindSchema> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(SchemaError::invalid(&self.schema.name, first));
        }
        Ok(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_key_shape() {
        let schema = KindBuilder::new(RecordKind::MorphologyI, KindRole::Horizon)
            .horizon_key()
            .text(&["symbol"])
            .build()
            .unwrap();
        assert_eq!(schema.key, vec!["iso", "id", "hori"]);
        assert_eq!(schema.field("iso").unwrap().pattern.as_deref(), Some(ISO_PATTERN));
        assert!(!schema.field("symbol").unwrap().required);
    }

    #[test]
    fn test_range_on_undeclared_field_fails_build() {
        let result = KindBuilder::new(RecordKind::ChemicalProperties, KindRole::DepthInterval)
            .horizon_key()
            .range(&["phh2o"], ValueRange::ph())
            .build();
        assert!(result.unwrap_err().message().contains("phh2o"));
    }
}
