use serde::{Deserialize, Serialize};

use crate::config;

/// Per-type physical and display properties.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TypeProps {
    pub radius: f64,
    pub influence_radius: f64,
    pub color: [u8; 4],
}

impl Default for TypeProps {
    fn default() -> Self {
        Self {
            radius: config::DEFAULT_RADIUS,
            influence_radius: config::DEFAULT_INFLUENCE_RADIUS,
            color: [255, 255, 255, 255],
        }
    }
}

/// Dynamic palette of particle types. Each registered type gets a stable
/// contiguous index; the interaction matrix and every particle refer to types
/// by that index, never by name or color value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    names: Vec<String>,
    props: Vec<TypeProps>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The palette the configuration panel starts from.
    pub fn default_palette() -> Self {
        let mut registry = Self::new();
        let palette: [(&str, [u8; 4]); 8] = [
            ("red", [230, 57, 70, 255]),
            ("green", [82, 183, 136, 255]),
            ("blue", [69, 123, 157, 255]),
            ("yellow", [255, 202, 58, 255]),
            ("purple", [155, 93, 229, 255]),
            ("cyan", [72, 202, 228, 255]),
            ("orange", [244, 140, 6, 255]),
            ("white", [241, 250, 238, 255]),
        ];
        for (name, color) in palette {
            registry.register(
                name,
                TypeProps {
                    color,
                    ..TypeProps::default()
                },
            );
        }
        registry
    }

    /// Register a type, returning its index. Re-registering a name updates the
    /// stored properties and keeps the existing index.
    pub fn register(&mut self, name: &str, props: TypeProps) -> usize {
        if let Some(id) = self.index_of(name) {
            self.props[id] = props;
            return id;
        }
        self.names.push(name.to_owned());
        self.props.push(props);
        self.names.len() - 1
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn props(&self, id: usize) -> Option<&TypeProps> {
        self.props.get(id)
    }

    pub fn all_ids(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}
