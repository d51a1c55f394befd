//! Registry configuration for the Markus API.
//!
//! Every supported operation is declared here once: its path, its
//! parameter rules and the shape of its response. Element names follow the
//! Markus XML schema.

use super::core::OperationRegistry;
use super::types::{Operation, OperationDescriptor};
use crate::binder::{Args, Coercion, ParameterRule};
use crate::coerce::{bool_to_wire, read_flag};
use crate::error::Result;
use crate::normalize::{Field, ItemsSpec, Shape};

/// `listType` sent when `coming_soon` is set.
pub const LIST_TYPE_COMING_SOON: &str = "ComingSoon";

/// `listType` sent otherwise.
pub const LIST_TYPE_NOW_IN_THEATRES: &str = "NowInTheatres";

/// Separator of the `Genres` element.
const GENRE_SEPARATOR: char = ',';

/// Create a registry holding all Markus API operations.
#[must_use]
pub fn create_markus_registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();

    registry.register(areas());
    registry.register(languages());
    registry.register(article_categories());
    registry.register(articles());
    registry.register(events());
    registry.register(shows());
    registry.register(schedule());

    registry
}

fn areas() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Areas, "TheatreAreas/")
        .with_root("TheatreAreas")
        .with_items(ItemsSpec::new(
            "TheatreArea",
            Shape::flat([
                Field::required("id", Shape::integer("ID")),
                Field::required("name", Shape::text("Name")),
            ]),
        ))
}

fn languages() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Languages, "Languages/")
        .with_root("Languages")
        .with_items(ItemsSpec::new(
            "Language",
            Shape::flat([
                Field::required("id", Shape::integer("ID")),
                Field::required("name", Shape::text("Name")),
                Field::or_empty("local_name", Shape::text("LocalName")),
                Field::or_empty("original_name", Shape::text("NameInLanguage")),
                Field::or_empty("code", Shape::text("ISOTwoLetterCode")),
                Field::or_empty("three_letter_code", Shape::text("ISOCode")),
            ]),
        ))
}

fn article_categories() -> OperationDescriptor {
    OperationDescriptor::new(Operation::ArticleCategories, "NewsCategories/")
        .with_root("NewsCategories")
        .with_items(ItemsSpec::new(
            "NewsArticleCategory",
            Shape::flat([
                Field::required("id", Shape::integer("ID")),
                Field::required("name", Shape::text("Name")),
                Field::optional("article_count", Shape::integer("NewsArticleCount")),
            ]),
        ))
}

fn articles() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Articles, "News/")
        .with_root("News")
        .with_parameters([
            plain("area"),
            renamed("event", "eventID"),
            renamed("category", "categoryID"),
        ])
        .with_items(ItemsSpec::new(
            "NewsArticle",
            Shape::flat([
                Field::required("title", Shape::text("Title")),
                Field::required("published", Shape::date("PublishDate")),
                Field::or_empty("abstract", Shape::text("HTMLLead")),
                Field::or_empty("content", Shape::text("HTMLContent")),
                Field::optional("event", Shape::integer("EventID")),
                Field::or_empty("url", Shape::text("ArticleURL")),
                Field::optional("image_url", Shape::text("ImageURL")),
                Field::optional("thumbnail_url", Shape::text("ThumbnailURL")),
                Field::or_empty(
                    "categories",
                    Shape::list(
                        "Categories/NewsArticleCategory",
                        Shape::flat([
                            Field::required("id", Shape::integer("ID")),
                            Field::or_empty("name", Shape::text("Name")),
                        ]),
                    ),
                ),
            ]),
        ))
}

/// Argument passed through under its own name.
fn plain(key: &str) -> ParameterRule {
    ParameterRule::plain(key).into()
}

/// Argument sent under a different query key.
fn renamed(key: &str, wire_key: &str) -> ParameterRule {
    ParameterRule::plain(key).with_wire_key(wire_key).into()
}

/// Rules for the four `include*` flags, each `false` unless overridden.
fn include_flag(source_key: &str, wire_key: &str) -> ParameterRule {
    ParameterRule::plain(source_key)
        .with_wire_key(wire_key)
        .with_coercion(Coercion::Bool)
        .with_default(bool_to_wire(false))
        .into()
}

/// Derive `listType` from the `coming_soon` flag.
fn list_type(args: &Args) -> Result<Option<String>> {
    let list_type = if read_flag(args, "coming_soon")? {
        LIST_TYPE_COMING_SOON
    } else {
        LIST_TYPE_NOW_IN_THEATRES
    };
    Ok(Some(list_type.to_string()))
}

fn events() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Events, "Events/")
        .with_root("Events")
        .with_parameters([
            include_flag("include_videos", "includeVideos"),
            include_flag("include_links", "includeLinks"),
            include_flag("include_gallery", "includeGallery"),
            include_flag("include_pictures", "includePictures"),
            ParameterRule::derived("listType", list_type),
            plain("area"),
            renamed("event", "eventID"),
        ])
        .with_items(ItemsSpec::new("Event", event_shape()))
}

fn shows() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Shows, "Schedule/")
        .with_root("Schedule")
        .with_parameters([
            ParameterRule::from(
                ParameterRule::plain("date")
                    .with_wire_key("dt")
                    .with_coercion(Coercion::Date),
            ),
            ParameterRule::from(
                ParameterRule::plain("days_from_date")
                    .with_wire_key("nrOfDays")
                    .with_coercion(Coercion::Integer)
                    .with_default("1"),
            ),
            plain("area"),
            renamed("event", "eventID"),
        ])
        .with_metadata([Field::required("published", Shape::date("PubDate"))])
        .with_items(ItemsSpec::new("Shows/Show", show_shape()))
}

fn schedule() -> OperationDescriptor {
    OperationDescriptor::new(Operation::Schedule, "ScheduleDates/")
        .with_root("Dates")
        .with_parameters([plain("area")])
        .with_items(ItemsSpec::new("dateTime", Shape::date("")))
}

/// Rating fields, stored flat on events and shows.
fn rating_shape() -> Shape {
    Shape::flat([
        Field::or_empty("name", Shape::text("Rating")),
        Field::or_empty("description", Shape::text("RatingLabel")),
        Field::or_empty("image_url", Shape::text("RatingImageUrl")),
    ])
}

/// Result keys for known image elements, shared by `Images` and `Pictures`.
///
/// Unlisted elements still come through, keyed by their snake-cased name.
const IMAGE_KEYS: [(&str, &str); 11] = [
    ("EventMicroImagePortrait", "micro_portrait"),
    ("EventSmallImagePortrait", "small_portrait"),
    ("EventMediumImagePortrait", "medium_portrait"),
    ("EventLargeImagePortrait", "large_portrait"),
    ("EventExtraLargeImagePortrait", "extralarge_portrait"),
    ("EventHDImagePortrait", "hd_portrait"),
    ("EventFullHDImagePortrait", "fullhd_portrait"),
    ("EventSmallImageLandscape", "small_landscape"),
    ("EventMediumImageLandscape", "medium_landscape"),
    ("EventLargeImageLandscape", "large_landscape"),
    ("EventPoster", "poster"),
];

fn image_group(path: &str) -> Shape {
    Shape::entries(path, IMAGE_KEYS)
}

/// `Images` and `Pictures` merged into one map; `Pictures` wins on collision.
fn images_shape() -> Shape {
    Shape::merge([image_group("Images"), image_group("Pictures")])
}

fn person_list(path: &str) -> Shape {
    Shape::list(
        path,
        Shape::flat([
            Field::or_empty("first_name", Shape::text("FirstName")),
            Field::or_empty("last_name", Shape::text("LastName")),
        ]),
    )
}

fn event_shape() -> Shape {
    Shape::flat([
        Field::required("id", Shape::integer("ID")),
        Field::required("title", Shape::text("Title")),
        Field::or_empty("original_title", Shape::text("OriginalTitle")),
        Field::optional("year", Shape::integer("ProductionYear")),
        Field::optional("length", Shape::integer("LengthInMinutes")),
        Field::optional("release_date", Shape::date("dtLocalRelease")),
        Field::required("rating", rating_shape()),
        Field::or_empty("production", Shape::text("ProductionCompanies")),
        Field::required(
            "distributor",
            Shape::flat([
                Field::or_empty("local_name", Shape::text("LocalDistributorName")),
                Field::or_empty("global_name", Shape::text("GlobalDistributorName")),
            ]),
        ),
        Field::or_empty("type", Shape::text("EventType")),
        Field::or_empty("genres", Shape::delimited("Genres", GENRE_SEPARATOR)),
        Field::or_empty("abstract", Shape::text("ShortSynopsis")),
        Field::or_empty("synopsis", Shape::text("Synopsis")),
        Field::or_empty("url", Shape::text("EventURL")),
        Field::or_empty(
            "videos",
            Shape::list(
                "Videos/EventVideo",
                Shape::flat([
                    Field::or_empty("title", Shape::text("Title")),
                    Field::required("url", Shape::text("Location")),
                    Field::or_empty("thumbnail_url", Shape::text("ThumbnailLocation")),
                    Field::or_empty("type", Shape::text("MediaResourceSubType")),
                    Field::or_empty("format", Shape::text("MediaResourceFormat")),
                ]),
            ),
        ),
        Field::or_empty(
            "links",
            Shape::list(
                "Links/EventLink",
                Shape::flat([
                    Field::or_empty("title", Shape::text("Title")),
                    Field::required("url", Shape::text("Location")),
                    Field::or_empty("type", Shape::text("LinkType")),
                ]),
            ),
        ),
        Field::or_empty(
            "gallery",
            Shape::list(
                "Gallery/GalleryImage",
                Shape::flat([
                    Field::or_empty("title", Shape::text("Title")),
                    Field::required("url", Shape::text("Location")),
                    Field::or_empty("thumbnail_url", Shape::text("ThumbnailLocation")),
                ]),
            ),
        ),
        Field::optional("images", images_shape()),
        Field::optional("actors", person_list("Cast/Actor")),
        Field::optional("directors", person_list("Directors/Director")),
    ])
}

/// Event data a show carries as flat sibling elements.
fn show_event_shape() -> Shape {
    Shape::flat([
        Field::required("id", Shape::integer("EventID")),
        Field::required("title", Shape::text("Title")),
        Field::or_empty("original_title", Shape::text("OriginalTitle")),
        Field::optional("year", Shape::integer("ProductionYear")),
        Field::optional("length", Shape::integer("LengthInMinutes")),
        Field::optional("release_date", Shape::date("dtLocalRelease")),
        Field::or_empty("genres", Shape::delimited("Genres", GENRE_SEPARATOR)),
        Field::or_empty("type", Shape::text("EventType")),
        Field::required("rating", rating_shape()),
        Field::optional("images", images_shape()),
        Field::or_empty("url", Shape::text("EventURL")),
    ])
}

fn show_shape() -> Shape {
    Shape::flat([
        Field::required("id", Shape::integer("ID")),
        Field::required("date", Shape::date("dtAccounting")),
        Field::optional("sales_end_time", Shape::datetime("ShowSalesEndTime")),
        Field::optional("sales_end_time_utc", Shape::datetime("ShowSalesEndTimeUTC")),
        Field::required("start_time", Shape::datetime("dttmShowStart")),
        Field::optional("start_time_utc", Shape::datetime("dttmShowStartUTC")),
        Field::optional("end_time", Shape::datetime("dttmShowEnd")),
        Field::optional("end_time_utc", Shape::datetime("dttmShowEndUTC")),
        Field::or_empty("url", Shape::text("ShowURL")),
        Field::required("event", show_event_shape()),
        Field::required(
            "theatre",
            Shape::flat([
                Field::required("id", Shape::integer("TheatreID")),
                Field::or_empty("name", Shape::text("Theatre")),
            ]),
        ),
        Field::required(
            "auditorium",
            Shape::flat([
                Field::required("id", Shape::integer("TheatreAuditoriumID")),
                Field::or_empty("name", Shape::text("TheatreAuditorium")),
                Field::or_empty("full_name", Shape::text("TheatreAndAuditorium")),
            ]),
        ),
        Field::required(
            "presentation",
            Shape::flat([
                Field::or_empty("method", Shape::text("PresentationMethod")),
                Field::or_empty("description", Shape::text("PresentationMethodAndLanguage")),
            ]),
        ),
    ])
}
