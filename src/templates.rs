//! Template loading and the helpers available to gallery templates.

use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera, Value};

use crate::error::AppError;
use crate::gallery::GalleryPage;

const INDEX_TEMPLATE: &str = "index.html";

/// Loads the index template from disk.
///
/// Read on every call so edits to the file show up without a restart.
pub fn load(path: &Path) -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_template_file(path, Some(INDEX_TEMPLATE))?;
    tera.register_function("add", add);
    tera.register_function("subtract", subtract);
    Ok(tera)
}

/// Render the index template at `path` for one page of the gallery.
pub fn render_index(path: &Path, page: &GalleryPage) -> Result<String, AppError> {
    let tera = load(path)?;
    let html = tera.render(INDEX_TEMPLATE, &index_context(page))?;
    Ok(html)
}

pub fn index_context(page: &GalleryPage) -> Context {
    let mut context = Context::new();
    context.insert("images", &page.images);
    context.insert("indexed_images", &page.indexed_images());
    context.insert("current_page", &page.info.current_page);
    context.insert("total_pages", &page.info.total_pages);
    context.insert("total_images", &page.info.total_images);
    context.insert("images_per_page", &page.info.images_per_page);
    context.insert("has_previous", &page.info.has_previous());
    context.insert("has_next", &page.info.has_next());
    context
}

fn int_arg(args: &HashMap<String, Value>, name: &str, function: &str) -> tera::Result<i64> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| tera::Error::msg(format!("`{}` expects an integer argument `{}`", function, name)))
}

/// `add(a=1, b=2)`
fn add(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let a = int_arg(args, "a", "add")?;
    let b = int_arg(args, "b", "add")?;
    Ok(Value::from(a.saturating_add(b)))
}

/// `subtract(a=3, b=1)`
fn subtract(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let a = int_arg(args, "a", "subtract")?;
    let b = int_arg(args, "b", "subtract")?;
    Ok(Value::from(a.saturating_sub(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(a: i64, b: i64) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Value::from(a));
        map.insert("b".to_string(), Value::from(b));
        map
    }

    #[test]
    fn add_and_subtract_helpers() {
        assert_eq!(add(&args(2, 1)).unwrap(), Value::from(3));
        assert_eq!(subtract(&args(2, 1)).unwrap(), Value::from(1));
        assert_eq!(subtract(&args(1, 5)).unwrap(), Value::from(-4));
    }

    #[test]
    fn helpers_reject_missing_arguments() {
        let mut only_a = HashMap::new();
        only_a.insert("a".to_string(), Value::from(1));
        assert!(add(&only_a).is_err());
        assert!(subtract(&HashMap::new()).is_err());
    }

    #[test]
    fn renders_page_links_with_helpers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(
            &path,
            "{% if has_previous %}prev={{ subtract(a=current_page, b=1) }} {% endif %}\
             {% for image in indexed_images %}[{{ image.index }}:{{ image.path }}]{% endfor %}\
             {% if has_next %} next={{ add(a=current_page, b=1) }}{% endif %} of {{ total_pages }}",
        )
        .unwrap();

        let all: Vec<String> = (0..5).map(|i| format!("{}.png", i)).collect();
        let page = GalleryPage::new(&all, 2, 2);

        let html = render_index(&path, &page).unwrap();

        assert_eq!(html, "prev=1 [2:2.png][3:3.png] next=3 of 3");
    }

    #[test]
    fn bundled_index_template_renders() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/index.html");
        let all: Vec<String> = (0..450).map(|i| format!("trip {}/p{:03}.jpg", i / 100, i)).collect();
        let page = GalleryPage::new(&all, 2, 200);

        let html = render_index(&path, &page).unwrap();

        assert!(html.contains("data-index=\"200\""));
        assert!(html.contains("data-index=\"399\""));
        assert!(!html.contains("data-index=\"400\""));
        assert!(html.contains("data-total=\"450\""));
        assert!(html.contains("/?page=1"));
        assert!(html.contains("/?page=3"));
        assert!(html.contains("trip%202"));
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let dir = tempdir().unwrap();
        let page = GalleryPage::new(&[], 1, 200);

        let result = render_index(&dir.path().join("absent.html"), &page);

        assert!(matches!(result, Err(AppError::Template(_))));
    }
}
