//! Template loading and rendering using Tera.
//!
//! Listings and prompts are rendered from template files, with embedded
//! fallbacks for when files don't exist.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tera::{Context, Tera};

/// Default templates directory relative to the working directory.
const TEMPLATES_DIR: &str = "templates";

/// Todo listing.
pub const LIST_TEMPLATE: &str = "todos/list.tera";

/// Single todo with all fields.
pub const DETAIL_TEMPLATE: &str = "todos/detail.tera";

/// Confirmation prompt for a pending action.
pub const CONFIRM_TEMPLATE: &str = "todos/confirm.tera";

/// Embedded default templates for fallback when files don't exist.
static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(LIST_TEMPLATE, include_str!("../templates/todos/list.tera"));
    m.insert(DETAIL_TEMPLATE, include_str!("../templates/todos/detail.tera"));
    m.insert(CONFIRM_TEMPLATE, include_str!("../templates/todos/confirm.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the template engine with templates from the specified directory.
///
/// If the directory doesn't exist, templates will be loaded from embedded defaults.
///
/// # Errors
///
/// Returns an error if the templates directory exists but contains invalid
/// templates, or an embedded template fails to parse.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let tera = load_templates(templates_dir)?;
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);
    Ok(())
}

fn load_templates(templates_dir: Option<&Path>) -> Result<Tera> {
    let dir = templates_dir.map_or_else(
        || std::env::current_dir().unwrap_or_default().join(TEMPLATES_DIR),
        Path::to_path_buf,
    );

    let mut tera = Tera::default();

    if dir.exists() {
        let glob_pattern = format!("{}/**/*.tera", dir.display());
        tera = Tera::new(&glob_pattern).map_err(|e| {
            Error::Template(format!("Failed to load templates from {}: {e}", dir.display()))
        })?;
    }

    // Add any missing templates from embedded defaults
    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .map_err(|e| Error::Template(format!("Invalid embedded template {name}: {e}")))?;
        }
    }

    Ok(tera)
}

/// Render a template with the given context.
///
/// Templates are lazy-loaded on first use.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    {
        let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
        if let Some(tera) = guard.as_ref() {
            return render_with(tera, name, context);
        }
    }

    let mut guard = TERA.write().map_err(|e| Error::Template(e.to_string()))?;
    if guard.is_none() {
        *guard = Some(load_templates(None)?);
    }
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    render_with(tera, name, context)
}

fn render_with(tera: &Tera, name: &str, context: &Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}

/// Get the list of all embedded template names.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    EMBEDDED_TEMPLATES.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn sample_todo() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "title": "Buy milk",
            "status": "TODO",
            "completed": false,
            "description": "semi-skimmed",
            "created": "Jan 1, 2024",
        })
    }

    #[test]
    #[serial]
    fn test_all_embedded_templates_render() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        let mut ctx = Context::new();
        ctx.insert("todos", &vec![sample_todo()]);
        ctx.insert("todo", &sample_todo());
        ctx.insert("empty_message", &Option::<String>::None);
        ctx.insert("filter_label", &Option::<String>::None);
        ctx.insert("message", "Sure?");

        for name in embedded_template_names() {
            let rendered = render(name, &ctx).unwrap();
            assert!(rendered.contains("Buy milk"), "{name} rendered: {rendered}");
        }
    }

    #[test]
    #[serial]
    fn test_filesystem_templates_override_embedded() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        let template_dir = dir.path().join("todos");
        fs::create_dir_all(&template_dir).unwrap();
        fs::write(template_dir.join("confirm.tera"), "CUSTOM: {{ message }}").unwrap();

        init_templates(Some(dir.path())).unwrap();

        let mut ctx = Context::new();
        ctx.insert("message", "ok?");
        assert_eq!(render(CONFIRM_TEMPLATE, &ctx).unwrap(), "CUSTOM: ok?");

        // Templates missing from the directory come from the embedded set
        ctx.insert("todo", &sample_todo());
        assert!(render(DETAIL_TEMPLATE, &ctx).unwrap().contains("Buy milk"));

        reset_cache().unwrap();
    }

    #[test]
    #[serial]
    fn test_render_missing_template_fails() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        let result = render("nonexistent/template.tera", &Context::new());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_init_with_invalid_templates_fails() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("invalid.tera"), "{% if foo %}unclosed if tag without endif")
            .unwrap();

        let result = init_templates(Some(dir.path()));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to load templates"), "Error was: {err}");
    }

    #[test]
    fn test_embedded_template_count() {
        assert_eq!(embedded_template_names().len(), 3);
    }
}
