use crate::domain::SectionSpec;

/// A titled group of fields, referenced by index into the form's field list.
#[derive(Debug, Clone)]
pub struct SectionState {
    pub title: String,
    pub fields: Vec<usize>,
}

impl SectionState {
    pub fn collect(spec: &SectionSpec, index_of: impl Fn(&str) -> Option<usize>) -> Self {
        Self {
            title: spec.title.clone(),
            fields: spec
                .fields
                .iter()
                .filter_map(|name| index_of(name))
                .collect(),
        }
    }
}
