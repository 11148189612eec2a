/*!
Record types of the Bot Connector REST API (v3).

[`CONNECTOR`] is built on first use and read-only afterwards.
*/

use lazy_static::lazy_static;

use crate::error::Error;

use super::{
    registry::Registry,
    types::{FieldDescriptor, FieldType, RecordType},
};

/// Role of a channel account
pub static ROLE_TYPES: &[&str] = &["user", "bot"];

lazy_static! {
    pub static ref CONNECTOR: Registry =
        connector_registry().expect("Bot connector schema is malformed");
}

fn string(name: &str, doc: &str) -> FieldDescriptor {
    FieldDescriptor::optional(name, FieldType::String).with_doc(doc)
}

fn record(name: &str, type_name: &str, doc: &str) -> FieldDescriptor {
    FieldDescriptor::optional(name, FieldType::Record(type_name.to_owned())).with_doc(doc)
}

fn any(name: &str, hint: &str, doc: &str) -> FieldDescriptor {
    FieldDescriptor::optional(name, FieldType::Any(hint.to_owned())).with_doc(doc)
}

fn role() -> FieldDescriptor {
    FieldDescriptor::optional(
        "role",
        FieldType::Enum(ROLE_TYPES.iter().map(|role| role.to_string()).collect()),
    )
    .with_doc("Role of the entity behind the account (Example: User, Bot, etc.)")
}

/// Register every connector record type in `registry`
pub fn register_connector_types(registry: &mut Registry) -> Result<(), Error> {
    registry.register(
        RecordType::builder()
            .name("ChannelAccount")
            .doc("Channel account information needed to route a message")
            .with_field(string(
                "id",
                "Channel id for the user or bot on this channel (Example: joe@smith.com, or @joesmith or 123456)",
            ))
            .with_field(string("name", "Display friendly name"))
            .with_field(string(
                "aadObjectId",
                "This account's object ID within Azure Active Directory (AAD)",
            ))
            .with_field(role())
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("ConversationAccount")
            .doc("Channel account information for a conversation")
            .with_field(
                FieldDescriptor::optional("isGroup", FieldType::Boolean).with_doc(
                    "Indicates whether the conversation contains more than two participants at the time the activity was generated",
                ),
            )
            .with_field(string(
                "conversationType",
                "Indicates the type of the conversation in channels that distinguish between conversation types",
            ))
            .with_field(string(
                "id",
                "Channel id for the user or bot on this channel (Example: joe@smith.com, or @joesmith or 123456)",
            ))
            .with_field(string("name", "Display friendly name"))
            .with_field(string(
                "aadObjectId",
                "This account's object ID within Azure Active Directory (AAD)",
            ))
            .with_field(role())
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("ConversationReference")
            .doc("An object relating to a particular point in a conversation")
            .with_field(string("activityId", "(Optional) ID of the activity to refer to"))
            .with_field(record(
                "user",
                "ChannelAccount",
                "(Optional) User participating in this conversation",
            ))
            .with_field(record(
                "bot",
                "ChannelAccount",
                "Bot participating in this conversation",
            ))
            .with_field(record(
                "conversation",
                "ConversationAccount",
                "Conversation reference",
            ))
            .with_field(string("channelId", "Channel ID"))
            .with_field(string(
                "serviceUrl",
                "Service endpoint where operations concerning the referenced conversation may be performed",
            ))
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("PaymentCurrencyAmount")
            .doc("Supplies monetary amounts")
            .with_field(string("currency", "A currency identifier"))
            .with_field(
                FieldDescriptor::optional("value", FieldType::Decimal)
                    .with_doc("Decimal monetary value"),
            )
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("PaymentItem")
            .doc("Indicates what the payment request is for and the value asked for")
            .with_field(string("label", "Human-readable description of the item"))
            .with_field(record(
                "amount",
                "PaymentCurrencyAmount",
                "Monetary amount for the item",
            ))
            .with_field(
                FieldDescriptor::optional("pending", FieldType::Boolean).with_doc(
                    "When set to true this flag means that the amount field is not final.",
                ),
            )
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("PostalAddress")
            .doc("Postal address (entity type: \"https://schema.org/PostalAddress\")")
            .with_field(string("streetAddress", "The street address"))
            .with_field(string("addressLocality", "The locality, e.g. the city"))
            .with_field(string("addressRegion", "The region, e.g. the state"))
            .with_field(string("postalCode", "The postal code"))
            .with_field(string("addressCountry", "The country"))
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("GeoCoordinates")
            .doc("GeoCoordinates (entity type: \"https://schema.org/GeoCoordinates\")")
            .with_field(
                FieldDescriptor::optional("elevation", FieldType::Decimal)
                    .with_doc("Elevation of the location [WGS 84](https://en.wikipedia.org/wiki/World_Geodetic_System)"),
            )
            .with_field(
                FieldDescriptor::optional("latitude", FieldType::Decimal)
                    .with_doc("Latitude of the location [WGS 84](https://en.wikipedia.org/wiki/World_Geodetic_System)"),
            )
            .with_field(
                FieldDescriptor::optional("longitude", FieldType::Decimal)
                    .with_doc("Longitude of the location [WGS 84](https://en.wikipedia.org/wiki/World_Geodetic_System)"),
            )
            .with_field(string("type", "The type of the thing"))
            .with_field(string("name", "The name of the thing"))
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("Thing")
            .doc("Thing (entity type: \"https://schema.org/Thing\")")
            .with_field(string("type", "The type of the thing"))
            .with_field(string("name", "The name of the thing"))
            .build()?,
    )?;

    registry.register(
        RecordType::builder()
            .name("Place")
            .doc("Place (entity type: \"https://schema.org/Place\")")
            .with_field(any(
                "address",
                "PostalAddress",
                "Address of the place (may be `string` or complex object of type `PostalAddress`)",
            ))
            .with_field(any(
                "geo",
                "GeoCoordinates",
                "Geo coordinates of the place (may be complex object of type `GeoCoordinates` or `GeoShape`)",
            ))
            .with_field(any(
                "hasMap",
                "Thing",
                "Map to the place (may be `string` (URL) or complex object of type `Map`)",
            ))
            .with_field(string("type", "The type of the thing"))
            .with_field(string("name", "The name of the thing"))
            .build()?,
    )?;

    registry.check_references()
}

/// A fresh registry holding the connector record types
pub fn connector_registry() -> Result<Registry, Error> {
    let mut registry = Registry::new();
    register_connector_types(&mut registry)?;
    Ok(registry)
}
