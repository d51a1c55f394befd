//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! Paths are slash-separated child element names (`"Shows/Show"`). An empty
//! path addresses the node itself. For leaf lookups a final `@name` segment
//! addresses an attribute instead of an element (`"Rating/@label"`).

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use markus_client::xml::get_tag_name;
///
/// let xml = r#"<Events xmlns="http://www.markus.fi/"><Event/></Events>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "Events");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use markus_client::xml::find_child;
///
/// let xml = r#"<Event><ID>1</ID><Title/></Event>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "ID").is_some());
/// assert!(find_child(root, "Cast").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a path of tag names.
///
/// Every segment follows the first matching child. An empty path returns
/// the node itself.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use markus_client::xml::find_by_path;
///
/// let xml = r#"<Schedule><Shows><Show><ID>1</ID></Show></Shows></Schedule>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let id = find_by_path(doc.root_element(), "Shows/Show/ID").unwrap();
/// assert_eq!(id.text(), Some("1"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path_segments(path).try_fold(node, |current, part| find_child(current, part))
}

/// Find every element matching a path whose last segment may repeat.
///
/// Leading segments follow the first matching child; the last segment
/// collects all matching siblings. A document holding a single matching
/// element yields a one-element vector, never the bare node, and a missing
/// intermediate element yields an empty vector.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use markus_client::xml::find_all_by_path;
///
/// let xml = r#"<Schedule><Shows><Show/></Shows></Schedule>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_all_by_path(doc.root_element(), "Shows/Show").len(), 1);
/// assert!(find_all_by_path(doc.root_element(), "Missing/Show").is_empty());
/// ```
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let Some((parent_path, last)) = split_last_segment(path) else {
        return vec![node];
    };

    match find_by_path(node, parent_path) {
        Some(parent) => parent
            .children()
            .filter(|child| child.is_element() && get_tag_name(*child) == last)
            .collect(),
        None => Vec::new(),
    }
}

/// Get the text content of a node, trimmed.
///
/// # Returns
/// Trimmed text content, or empty string if no text
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Resolve a leaf path to its text.
///
/// Returns `None` when an element on the path is missing. A present but
/// empty element resolves to `Some("")`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use markus_client::xml::resolve_text;
///
/// let xml = r#"<Show lang="lv"><Theatre> Kino Citadele </Theatre><Title/></Show>"#;
/// let doc = Document::parse(xml).unwrap();
/// let show = doc.root_element();
///
/// assert_eq!(resolve_text(show, "Theatre").as_deref(), Some("Kino Citadele"));
/// assert_eq!(resolve_text(show, "Title").as_deref(), Some(""));
/// assert_eq!(resolve_text(show, "@lang").as_deref(), Some("lv"));
/// assert_eq!(resolve_text(show, "Missing"), None);
/// ```
pub fn resolve_text(node: Node<'_, '_>, path: &str) -> Option<String> {
    match split_last_segment(path) {
        Some((element_path, last)) if last.starts_with('@') => {
            let owner = find_by_path(node, element_path)?;
            get_attribute(owner, &last[1..]).map(str::to_string)
        }
        _ => find_by_path(node, path).map(get_text),
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

/// Split `"a/b/c"` into `("a/b", "c")`. Returns `None` for an empty path.
///
/// # Examples
/// ```
/// use markus_client::xml::split_last_segment;
///
/// assert_eq!(split_last_segment("Shows/Show"), Some(("Shows", "Show")));
/// assert_eq!(split_last_segment("Show"), Some(("", "Show")));
/// assert_eq!(split_last_segment(""), None);
/// ```
pub fn split_last_segment(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(match trimmed.rsplit_once('/') {
        Some((parent, last)) => (parent, last),
        None => ("", trimmed),
    })
}
