//! DOCTYPE declaration model

use std::fmt;

/// Public identifier of the VLE 1.2 project DTD
pub const VLE_PUBLIC_ID: &str = "-//VLE TEAM//DTD Strict//EN";

/// System identifier of the VLE 1.2 project DTD
pub const VLE_1_2_SYSTEM_ID: &str = "http://www.vle-project.org/vle-1.2.0.dtd";

/// Qualified name of a VPZ root element
pub const VLE_ROOT_NAME: &str = "vle_project";

/// The body of a `<!DOCTYPE ...>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    pub internal_subset: Option<String>,
}

impl Doctype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_id: None,
            system_id: None,
            internal_subset: None,
        }
    }

    /// `<!DOCTYPE name PUBLIC "public_id" "system_id">`
    pub fn public(
        name: impl Into<String>,
        public_id: impl Into<String>,
        system_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            public_id: Some(public_id.into()),
            system_id: Some(system_id.into()),
            internal_subset: None,
        }
    }

    /// The declaration every migrated VPZ file carries
    pub fn vle_1_2() -> Self {
        Self::public(VLE_ROOT_NAME, VLE_PUBLIC_ID, VLE_1_2_SYSTEM_ID)
    }

    /// Parse the text found between `<!DOCTYPE` and the closing `>`.
    ///
    /// Returns `None` when the body does not follow the
    /// `name [PUBLIC "pub" "sys" | SYSTEM "sys"] [[subset]]` shape.
    pub fn parse(body: &str) -> Option<Self> {
        let body = body.trim();
        let name_end = body
            .find(|c: char| c.is_whitespace() || c == '[')
            .unwrap_or(body.len());
        let name = &body[..name_end];
        if name.is_empty() {
            return None;
        }

        let mut doctype = Self::new(name);
        let mut rest = body[name_end..].trim_start();

        if let Some(after) = rest.strip_prefix("PUBLIC") {
            let (public_id, after) = quoted(after)?;
            let (system_id, after) = quoted(after)?;
            doctype.public_id = Some(public_id.to_string());
            doctype.system_id = Some(system_id.to_string());
            rest = after;
        } else if let Some(after) = rest.strip_prefix("SYSTEM") {
            let (system_id, after) = quoted(after)?;
            doctype.system_id = Some(system_id.to_string());
            rest = after;
        }

        let rest = rest.trim();
        if !rest.is_empty() {
            let subset = rest.strip_prefix('[')?.strip_suffix(']')?;
            doctype.internal_subset = Some(subset.to_string());
        }

        Some(doctype)
    }
}

/// Split a leading quoted literal off `input`
fn quoted(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &input[1..];
    let end = inner.find(quote)?;
    Some((&inner[..end], &inner[end + 1..]))
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if value.contains('"') {
        write!(f, " '{}'", value)
    } else {
        write!(f, " \"{}\"", value)
    }
}

impl fmt::Display for Doctype {
    /// Render the declaration body, without the `<!DOCTYPE` keyword
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (&self.public_id, &self.system_id) {
            (Some(public_id), Some(system_id)) => {
                write!(f, " PUBLIC")?;
                write_literal(f, public_id)?;
                write_literal(f, system_id)?;
            }
            (Some(public_id), None) => {
                write!(f, " PUBLIC")?;
                write_literal(f, public_id)?;
            }
            (None, Some(system_id)) => {
                write!(f, " SYSTEM")?;
                write_literal(f, system_id)?;
            }
            (None, None) => {}
        }
        if let Some(subset) = &self.internal_subset {
            write!(f, " [{}]", subset)?;
        }
        Ok(())
    }
}
