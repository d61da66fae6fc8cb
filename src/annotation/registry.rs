//! The per-project class registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::ClassIndex;
use super::model::{AnnotationRecord, ClassDefinition};
use crate::error::SegsetError;

/// Class definitions of one project, keyed and ordered by class index.
///
/// Indices and names are unique and every color is `#RRGGBB`. The registry
/// serializes as a plain list of definitions in ascending index order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ClassDefinition>", into = "Vec<ClassDefinition>")]
pub struct ClassRegistry {
    classes: BTreeMap<ClassIndex, ClassDefinition>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, rejecting duplicate indices or names and bad colors.
    pub fn from_classes(
        classes: impl IntoIterator<Item = ClassDefinition>,
    ) -> Result<Self, SegsetError> {
        let mut registry = Self::new();
        for class in classes {
            registry.add(class)?;
        }
        Ok(registry)
    }

    /// Adds a class definition.
    ///
    /// # Errors
    /// Returns [`SegsetError::InvalidClassRegistry`] if the index or name is
    /// already taken, the name is blank, or the color is not `#RRGGBB`.
    pub fn add(&mut self, class: ClassDefinition) -> Result<(), SegsetError> {
        if class.name.trim().is_empty() {
            return Err(invalid(format!(
                "class {} has an empty name",
                class.class_index
            )));
        }
        if !is_hex_color(&class.color) {
            return Err(invalid(format!(
                "class '{}' has color '{}', expected #RRGGBB",
                class.name, class.color
            )));
        }
        if self.classes.contains_key(&class.class_index) {
            return Err(invalid(format!(
                "class index {} is already used",
                class.class_index
            )));
        }
        if self.by_name(&class.name).is_some() {
            return Err(invalid(format!(
                "class name '{}' is already used",
                class.name
            )));
        }

        self.classes.insert(class.class_index, class);
        Ok(())
    }

    pub fn get(&self, class_index: ClassIndex) -> Option<&ClassDefinition> {
        self.classes.get(&class_index)
    }

    pub fn contains(&self, class_index: ClassIndex) -> bool {
        self.classes.contains_key(&class_index)
    }

    pub fn by_name(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.values().find(|c| c.name == name)
    }

    /// Definitions in ascending class index order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> + '_ {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The index a new class should get: one past the highest, or 0.
    ///
    /// # Errors
    /// Returns [`SegsetError::InvalidClassRegistry`] when the highest index
    /// is already `u32::MAX`.
    pub fn next_class_index(&self) -> Result<ClassIndex, SegsetError> {
        match self.classes.keys().next_back() {
            None => Ok(ClassIndex(0)),
            Some(last) => last.0.checked_add(1).map(ClassIndex).ok_or_else(|| {
                invalid(format!("no class index left after {}", last.0))
            }),
        }
    }

    /// Fails with [`SegsetError::ClassInUse`] while any annotation uses the class.
    pub fn ensure_removable(
        &self,
        class_index: ClassIndex,
        annotations: &[AnnotationRecord],
    ) -> Result<(), SegsetError> {
        let references = annotations
            .iter()
            .filter(|a| a.class_index == class_index)
            .count();
        if references > 0 {
            return Err(SegsetError::ClassInUse {
                class_index: class_index.as_u32(),
                references,
            });
        }
        Ok(())
    }

    /// Removes an unreferenced class.
    ///
    /// Returns `Ok(None)` if the class was not registered.
    pub fn remove(
        &mut self,
        class_index: ClassIndex,
        annotations: &[AnnotationRecord],
    ) -> Result<Option<ClassDefinition>, SegsetError> {
        self.ensure_removable(class_index, annotations)?;
        Ok(self.classes.remove(&class_index))
    }
}

impl TryFrom<Vec<ClassDefinition>> for ClassRegistry {
    type Error = SegsetError;

    fn try_from(classes: Vec<ClassDefinition>) -> Result<Self, Self::Error> {
        Self::from_classes(classes)
    }
}

impl From<ClassRegistry> for Vec<ClassDefinition> {
    fn from(registry: ClassRegistry) -> Self {
        registry.classes.into_values().collect()
    }
}

/// True if any annotation is assigned to `class_index`.
pub fn is_class_referenced(class_index: ClassIndex, annotations: &[AnnotationRecord]) -> bool {
    annotations.iter().any(|a| a.class_index == class_index)
}

/// Checks for a `#RRGGBB` color string.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn invalid(message: String) -> SegsetError {
    SegsetError::InvalidClassRegistry { message }
}
