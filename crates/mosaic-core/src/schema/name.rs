use heck::{ToSnakeCase, ToUpperCamelCase};

/// A model name split into its words, used to derive storage names.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let parts = src
            .to_snake_case()
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    /// Snake case with the last word pluralized, e.g. `ProcessorModel` → `processor_models`.
    pub fn plural_snake_case(&self) -> String {
        let Some((last, rest)) = self.parts.split_last() else {
            return String::new();
        };

        let mut parts = rest.to_vec();
        parts.push(pluralizer::pluralize(last, 2, false));
        parts.join("_")
    }
}
