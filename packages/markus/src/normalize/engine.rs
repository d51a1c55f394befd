//! Shape interpreter turning response XML into result values.

use heck::ToSnakeCase;
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use super::shape::{Field, LeafKind, Presence, Shape};
use crate::coerce::{iso_date, parse_integer};
use crate::error::{MarkusError, Result};
use crate::registry::OperationDescriptor;
use crate::xml::{
    find_all_by_path, find_by_path, get_tag_name, get_text, resolve_text, split_last_segment,
};

/// Key of the item sequence in every result.
pub const ITEMS_KEY: &str = "items";

/// Parse a raw XML body and normalize it.
pub fn normalize_xml(descriptor: &OperationDescriptor, xml: &str) -> Result<Value> {
    let doc = Document::parse(xml)?;
    normalize(descriptor, &doc)
}

/// Normalize a parsed response document according to the descriptor.
///
/// The result is an object holding the descriptor's metadata fields
/// followed by `items`, which is always an array: a response with a single
/// item element yields a one-element array.
///
/// # Errors
/// `MalformedResponse` when the root element does not match, a required
/// field is missing or a typed leaf cannot be converted.
pub fn normalize(descriptor: &OperationDescriptor, doc: &Document<'_>) -> Result<Value> {
    let root = locate_root(descriptor, doc)?;
    let context = descriptor.root.as_str();

    let mut result = extract_fields(&descriptor.metadata, root, context)?;

    let items_spec = &descriptor.items;
    let nodes = find_all_by_path(root, &items_spec.path);
    let mut items = Vec::with_capacity(nodes.len());

    for (index, node) in nodes.into_iter().enumerate() {
        let item_context = format!("{context}/{}[{index}]", get_tag_name(node));
        let item = extract(&items_spec.shape, node, &item_context)?.ok_or_else(|| {
            MarkusError::malformed(&item_context, "item holds no extractable value")
        })?;
        items.push(item);
    }

    tracing::debug!(
        operation = %descriptor.operation,
        items = items.len(),
        "Normalized response"
    );

    result.insert(ITEMS_KEY.to_string(), Value::Array(items));
    Ok(Value::Object(result))
}

/// Find the node the result is read from.
///
/// The first segment of the descriptor's root path must name the document
/// element; further segments descend from it.
fn locate_root<'a, 'input>(
    descriptor: &OperationDescriptor,
    doc: &'a Document<'input>,
) -> Result<Node<'a, 'input>> {
    let document_element = doc.root_element();
    let root_path = descriptor.root.trim_matches('/');
    let (expected, rest) = root_path.split_once('/').unwrap_or((root_path, ""));

    let actual = get_tag_name(document_element);
    if actual != expected {
        return Err(MarkusError::malformed(
            descriptor.operation.to_string(),
            format!("expected root element <{expected}>, found <{actual}>"),
        ));
    }

    find_by_path(document_element, rest).ok_or_else(|| {
        MarkusError::malformed(
            descriptor.operation.to_string(),
            format!("missing result root <{}>", descriptor.root),
        )
    })
}

/// Extract every field into a map, applying presence rules.
fn extract_fields(fields: &[Field], node: Node<'_, '_>, context: &str) -> Result<Map<String, Value>> {
    let mut map = Map::new();

    for field in fields {
        let field_context = format!("{context}.{}", field.key);
        match (extract(&field.shape, node, &field_context)?, field.presence) {
            (Some(value), _) => {
                map.insert(field.key.clone(), value);
            }
            (None, Presence::Optional) => {}
            (None, Presence::OrEmpty) => {
                map.insert(field.key.clone(), empty_value(&field.shape));
            }
            (None, Presence::Required) => {
                return Err(MarkusError::malformed(
                    context,
                    format!("missing required field '{}'", field.key),
                ));
            }
        }
    }

    Ok(map)
}

/// Apply a shape to a node. `Ok(None)` means the source is absent.
fn extract(shape: &Shape, node: Node<'_, '_>, context: &str) -> Result<Option<Value>> {
    match shape {
        Shape::Leaf { path, kind } => match resolve_text(node, path) {
            Some(text) => convert_leaf(&text, *kind, context),
            None => Ok(None),
        },

        Shape::Object { path, fields } => match find_by_path(node, path) {
            Some(base) => extract_fields(fields, base, context).map(|m| Some(Value::Object(m))),
            None => Ok(None),
        },

        Shape::List { path, item } => extract_list(path, item, node, context),

        Shape::Delimited { path, separator } => Ok(resolve_text(node, path).map(|text| {
            Value::Array(
                text.split(*separator)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            )
        })),

        Shape::Entries { path, keys } => Ok(find_by_path(node, path).map(|base| {
            let mut map = Map::new();
            for child in base.children().filter(|child| child.is_element()) {
                let tag = get_tag_name(child);
                let key = keys
                    .iter()
                    .find(|(element, _)| element == tag)
                    .map_or_else(|| tag.to_snake_case(), |(_, key)| key.clone());
                map.insert(key, Value::String(get_text(child)));
            }
            Value::Object(map)
        })),

        Shape::Merge(parts) => {
            let mut merged: Option<Map<String, Value>> = None;
            for part in parts {
                match extract(part, node, context)? {
                    // Later parts win on key collision.
                    Some(Value::Object(map)) => merged.get_or_insert_with(Map::new).extend(map),
                    Some(_) => {
                        return Err(MarkusError::malformed(
                            context,
                            "merged group did not produce an object",
                        ))
                    }
                    None => {}
                }
            }
            Ok(merged.map(Value::Object))
        }
    }
}

/// Collect a repeating group. Absent only when its container element is.
fn extract_list(
    path: &str,
    item: &Shape,
    node: Node<'_, '_>,
    context: &str,
) -> Result<Option<Value>> {
    let Some((container_path, _)) = split_last_segment(path) else {
        return Err(MarkusError::malformed(context, "list path is empty"));
    };
    if find_by_path(node, container_path).is_none() {
        return Ok(None);
    }

    let mut values = Vec::new();
    for (index, child) in find_all_by_path(node, path).into_iter().enumerate() {
        let child_context = format!("{context}[{index}]");
        let value = extract(item, child, &child_context)?.ok_or_else(|| {
            MarkusError::malformed(&child_context, "list entry holds no extractable value")
        })?;
        values.push(value);
    }

    Ok(Some(Value::Array(values)))
}

/// Convert leaf text. Empty text counts as absent for typed leaves.
fn convert_leaf(text: &str, kind: LeafKind, context: &str) -> Result<Option<Value>> {
    if text.is_empty() && kind != LeafKind::Text {
        return Ok(None);
    }

    let value = match kind {
        LeafKind::Integer => Value::from(parse_integer(text, context)?),
        LeafKind::Text | LeafKind::DateTime => Value::String(text.to_string()),
        LeafKind::Date => Value::String(iso_date(text, context)?),
    };
    Ok(Some(value))
}

fn empty_value(shape: &Shape) -> Value {
    match shape {
        Shape::Leaf { .. } => Value::String(String::new()),
        Shape::Object { .. } | Shape::Entries { .. } | Shape::Merge(_) => {
            Value::Object(Map::new())
        }
        Shape::List { .. } | Shape::Delimited { .. } => Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Operation, OperationDescriptor};
    use crate::normalize::{Field, ItemsSpec, Shape};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn descriptor(shape: Shape) -> OperationDescriptor {
        OperationDescriptor::new(Operation::Events, "Events/")
            .with_root("Events")
            .with_items(ItemsSpec::new("Event", shape))
    }

    fn event_shape() -> Shape {
        Shape::flat([
            Field::required("id", Shape::integer("ID")),
            Field::or_empty("title", Shape::text("Title")),
            Field::optional("actors", Shape::list("Cast/Actor", Shape::text("Name"))),
        ])
    }

    #[test]
    fn test_zero_items_yield_empty_array() {
        let result = normalize_xml(&descriptor(event_shape()), "<Events/>").unwrap();
        assert_eq!(result, json!({"items": []}));
    }

    #[test]
    fn test_single_item_yields_one_element_array() {
        let xml = "<Events><Event><ID>7</ID><Title>Rio 2</Title></Event></Events>";
        let result = normalize_xml(&descriptor(event_shape()), xml).unwrap();
        assert_eq!(result, json!({"items": [{"id": 7, "title": "Rio 2"}]}));
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let err = normalize_xml(&descriptor(event_shape()), "<Languages/>").unwrap_err();
        assert!(matches!(err, MarkusError::MalformedResponse { .. }));
        assert!(err.to_string().contains("<Events>"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let xml = "<Events><Event><Title>No id</Title></Event></Events>";
        let err = normalize_xml(&descriptor(event_shape()), xml).unwrap_err();
        assert!(err.to_string().contains("'id'"));
        assert!(err.to_string().contains("Events/Event[0]"));
    }

    #[test]
    fn test_non_numeric_integer_fails() {
        let xml = "<Events><Event><ID>abc</ID></Event></Events>";
        let err = normalize_xml(&descriptor(event_shape()), xml).unwrap_err();
        assert!(matches!(err, MarkusError::MalformedResponse { .. }));
    }

    #[test]
    fn test_or_empty_and_optional_presence() {
        let xml = "<Events><Event><ID>1</ID></Event></Events>";
        let result = normalize_xml(&descriptor(event_shape()), xml).unwrap();
        assert_eq!(result["items"][0], json!({"id": 1, "title": ""}));
    }

    #[test]
    fn test_present_but_empty_list() {
        let xml = "<Events><Event><ID>1</ID><Title/><Cast/></Event></Events>";
        let result = normalize_xml(&descriptor(event_shape()), xml).unwrap();
        assert_eq!(result["items"][0]["actors"], json!([]));
    }

    #[test]
    fn test_merge_last_wins_on_collision() {
        let shape = Shape::flat([
            Field::required("id", Shape::integer("ID")),
            Field::optional(
                "images",
                Shape::merge([
                    Shape::object(
                        "Images",
                        [
                            Field::optional("poster", Shape::text("Poster")),
                            Field::optional("small", Shape::text("Small")),
                        ],
                    ),
                    Shape::object("Pictures", [Field::optional("poster", Shape::text("Poster"))]),
                ]),
            ),
        ]);
        let xml = "<Events><Event><ID>1</ID>\
            <Images><Poster>a.jpg</Poster><Small>s.jpg</Small></Images>\
            <Pictures><Poster>b.jpg</Poster></Pictures>\
            </Event></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert_eq!(
            result["items"][0]["images"],
            json!({"poster": "b.jpg", "small": "s.jpg"})
        );
    }

    #[test]
    fn test_merge_with_all_parts_absent_is_omitted() {
        let shape = Shape::flat([
            Field::required("id", Shape::integer("ID")),
            Field::optional(
                "images",
                Shape::merge([
                    Shape::object("Images", Vec::<Field>::new()),
                    Shape::object("Pictures", Vec::<Field>::new()),
                ]),
            ),
        ]);
        let xml = "<Events><Event><ID>1</ID></Event></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert!(result["items"][0].get("images").is_none());
    }

    #[test]
    fn test_entries_keep_unlisted_children() {
        let shape = Shape::flat([Field::optional(
            "images",
            Shape::entries("Pictures", [("EventPoster", "poster")]),
        )]);
        let xml = "<Events><Event><Pictures>\
            <EventPoster>p.jpg</EventPoster>\
            <EventSmallImageLandscape> s.jpg </EventSmallImageLandscape>\
            </Pictures></Event><Event/></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert_eq!(
            result["items"][0]["images"],
            json!({"poster": "p.jpg", "event_small_image_landscape": "s.jpg"})
        );
        assert!(result["items"][1].get("images").is_none());
    }

    #[test]
    fn test_entries_merge_last_wins() {
        let shape = Shape::flat([Field::or_empty(
            "images",
            Shape::merge([
                Shape::entries("Images", [("Poster", "poster")]),
                Shape::entries("Pictures", [("Poster", "poster")]),
            ]),
        )]);
        let xml = "<Events><Event>\
            <Images><Poster>a.jpg</Poster><Thumb>t.jpg</Thumb></Images>\
            <Pictures><Poster>b.jpg</Poster></Pictures>\
            </Event><Event/></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert_eq!(result["items"][0]["images"], json!({"poster": "b.jpg", "thumb": "t.jpg"}));
        assert_eq!(result["items"][1]["images"], json!({}));
    }

    #[test]
    fn test_delimited_leaf() {
        let shape = Shape::flat([Field::or_empty("genres", Shape::delimited("Genres", ','))]);
        let xml = "<Events><Event><Genres>Drama, Comedy,, </Genres></Event><Event/></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert_eq!(result["items"][0]["genres"], json!(["Drama", "Comedy"]));
        assert_eq!(result["items"][1]["genres"], json!([]));
    }

    #[test]
    fn test_empty_typed_leaf_counts_as_absent() {
        let shape = Shape::flat([
            Field::optional("release_date", Shape::date("dtLocalRelease")),
            Field::optional("length", Shape::integer("LengthInMinutes")),
        ]);
        let xml = "<Events><Event><dtLocalRelease/><LengthInMinutes> </LengthInMinutes></Event></Events>";

        let result = normalize_xml(&descriptor(shape), xml).unwrap();
        assert_eq!(result["items"][0], json!({}));
    }

    #[test]
    fn test_impossible_date_fails() {
        let shape = Shape::flat([Field::optional("release_date", Shape::date("dtLocalRelease"))]);
        let xml = "<Events><Event><dtLocalRelease>2014-13-45T00:00:00</dtLocalRelease></Event></Events>";

        let err = normalize_xml(&descriptor(shape), xml).unwrap_err();
        assert!(matches!(err, MarkusError::MalformedResponse { .. }));
        assert!(err.to_string().contains("2014-13-45"));
    }

    #[test]
    fn test_metadata_precedes_items() {
        let descriptor = OperationDescriptor::new(Operation::Shows, "Schedule/")
            .with_root("Schedule")
            .with_metadata([Field::required("published", Shape::date("PubDate"))])
            .with_items(ItemsSpec::new("Shows/Show", Shape::flat(Vec::<Field>::new())));
        let xml = "<Schedule><PubDate>2014-04-27T09:00:00</PubDate><Shows/></Schedule>";

        let result = normalize_xml(&descriptor, xml).unwrap();
        let keys: Vec<_> = result.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["published", "items"]);
        assert_eq!(result["published"], json!("2014-04-27"));
    }

    #[test]
    fn test_scalar_items() {
        let descriptor = OperationDescriptor::new(Operation::Schedule, "ScheduleDates/")
            .with_root("Dates")
            .with_items(ItemsSpec::new("dateTime", Shape::date("")));
        let xml = "<Dates><dateTime>2014-05-01T00:00:00</dateTime></Dates>";

        let result = normalize_xml(&descriptor, xml).unwrap();
        assert_eq!(result, json!({"items": ["2014-05-01"]}));
    }

    #[test]
    fn test_invalid_xml() {
        let err = normalize_xml(&descriptor(event_shape()), "<Events>").unwrap_err();
        assert!(matches!(err, MarkusError::XmlParse(_)));
    }
}
