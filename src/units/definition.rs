//! # Static unit definitions.
//!
//! [`Definition`] is the immutable description a loading collaborator hands
//! to the runtime: human-readable metadata plus the five relationship name
//! lists. Names are unresolved here — turning them into unit handles is the
//! resolver's job at activation time.
//!
//! ## Rules
//! - A definition never changes after the unit is shared.
//! - Relationship lists refer to peers by name, in declaration order.
//! - [`Definition::validate`] rejects definitions whose requirement side
//!   overlaps `conflicts`, and lists that name the unit itself. Both are
//!   definition errors, caught at load time, never at runtime.

use crate::error::DefinitionError;

/// The `[Unit]` section: description, documentation and relationships.
#[derive(Clone, Debug, Default)]
pub struct UnitSection {
    /// Human-readable description.
    pub description: String,
    /// Documentation URIs, in declaration order.
    pub documentation: Vec<String>,
    /// Units that must be active before this one starts (ordering only).
    pub after: Vec<String>,
    /// Best-effort dependencies: started along with this unit, failures
    /// are logged and swallowed.
    pub wants: Vec<String>,
    /// Mandatory dependencies: must reach active or this unit fails.
    pub requires: Vec<String>,
    /// Mutual exclusion: this unit refuses to start while any of these is
    /// active.
    pub conflicts: Vec<String>,
    /// Units this one must precede (ordering only).
    pub before: Vec<String>,
}

/// The `[Install]` section: where enabling this unit hooks it in.
#[derive(Clone, Debug, Default)]
pub struct InstallSection {
    pub wanted_by: Option<String>,
}

/// Immutable unit description, created once at load time.
#[derive(Clone, Debug, Default)]
pub struct Definition {
    pub unit: UnitSection,
    pub install: InstallSection,
}

impl Definition {
    /// Checks the relationship lists for `unit_name`.
    ///
    /// A name on the requirement side (`requires`/`wants`/`after`) that
    /// also appears in `conflicts` is an [`Overlap`]; a list naming the
    /// unit itself is a [`SelfReference`].
    ///
    /// [`Overlap`]: DefinitionError::Overlap
    /// [`SelfReference`]: DefinitionError::SelfReference
    pub fn validate(&self, unit_name: &str) -> Result<(), DefinitionError> {
        let lists: [(&'static str, &[String]); 5] = [
            ("After=", &self.unit.after),
            ("Wants=", &self.unit.wants),
            ("Requires=", &self.unit.requires),
            ("Conflicts=", &self.unit.conflicts),
            ("Before=", &self.unit.before),
        ];
        for (label, list) in lists {
            if list.iter().any(|n| n == unit_name) {
                return Err(DefinitionError::SelfReference {
                    unit: unit_name.to_string(),
                    list: label,
                });
            }
        }

        for name in &self.unit.conflicts {
            let required = self.unit.requires.contains(name)
                || self.unit.wants.contains(name)
                || self.unit.after.contains(name);
            if required {
                return Err(DefinitionError::Overlap {
                    unit: unit_name.to_string(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Builder-style constructors, the shape a hand-written loader uses.
impl Definition {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.unit.description = description.into();
        self
    }

    pub fn with_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.after = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_wants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.wants = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.requires = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_conflicts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.conflicts = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.before = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_wanted_by(mut self, target: impl Into<String>) -> Self {
        self.install.wanted_by = Some(target.into());
        self
    }
}
