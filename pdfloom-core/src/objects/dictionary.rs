use crate::objects::Object;
use indexmap::IndexMap;

/// Dictionary whose entries serialize in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `key`; a replaced key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    pub fn to_inline_string(&self) -> String {
        let mut out = String::from("<<");
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push('/');
            out.push_str(key);
            out.push(' ');
            out.push_str(&value.to_pdf_string());
        }
        out.push_str(">>");
        out
    }

    /// One line per entry, nested dictionaries expanded the same way:
    ///
    /// ```text
    /// <<
    /// /Type /Font
    /// >>
    /// ```
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec!["<<".to_string()];
        self.push_entry_lines(&mut lines);
        lines.push(">>".to_string());
        lines
    }

    fn push_entry_lines(&self, lines: &mut Vec<String>) {
        for (key, value) in &self.entries {
            match value {
                Object::Dictionary(nested) => {
                    lines.push(format!("/{key} <<"));
                    nested.push_entry_lines(lines);
                    lines.push(">>".to_string());
                }
                other => lines.push(format!("/{key} {}", other.to_pdf_string())),
            }
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
        assert!(Dictionary::with_capacity(10).is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Name", "Test");
        dict.set("Age", 42);
        dict.set("Active", true);

        assert_eq!(dict.get("Name"), Some(&Object::String("Test".to_string())));
        assert_eq!(dict.get("Age"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Active"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Form"));
        dict.set("Length", 10);
        dict.set("Type", Object::name("Pattern"));

        let keys: Vec<_> = dict.keys().cloned().collect();
        assert_eq!(keys, vec!["Type", "Subtype", "Length"]);
    }

    #[test]
    fn test_remove() {
        let mut dict = Dictionary::new();
        dict.set("A", 1);
        dict.set("Temp", "Value");
        dict.set("B", 2);

        assert_eq!(dict.remove("Temp"), Some(Object::String("Value".to_string())));
        assert!(!dict.contains_key("Temp"));
        assert_eq!(dict.keys().cloned().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_to_lines_expands_nested() {
        let mut fonts = Dictionary::new();
        fonts.set("F1", ObjectId::from(5));
        fonts.set("F2", ObjectId::from(6));

        let mut dict = Dictionary::new();
        dict.set("ProcSet", Object::raw("[/PDF /Text]"));
        dict.set("Font", fonts);

        assert_eq!(
            dict.to_lines(),
            vec![
                "<<",
                "/ProcSet [/PDF /Text]",
                "/Font <<",
                "/F1 5 0 R",
                "/F2 6 0 R",
                ">>",
                ">>",
            ]
        );
    }

    #[test]
    fn test_inline_string() {
        let mut dict = Dictionary::new();
        dict.set("Predictor", 15);
        dict.set("Colors", 3);
        assert_eq!(dict.to_inline_string(), "<</Predictor 15 /Colors 3>>");
    }
}
