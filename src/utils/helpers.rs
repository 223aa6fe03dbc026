use mongodb::bson::oid::ObjectId;
use serde::Serializer;

/// Name reported in every response body, taken from `SERVICE_NAME`.
pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string())
}

/// Serializes an `ObjectId` as its 24-character hex string in API responses.
pub fn serialize_object_id<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_hex())
}
