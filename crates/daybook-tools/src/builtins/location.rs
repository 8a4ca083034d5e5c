//! Builtin tool reporting the device's current location.

use crate::reply::{ReplyMessage, ToolReply};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use daybook_protocol::ToolError;
use log::info;
use serde_json::{Value, json};

/// Tool answering "where am I" with a location message.
#[derive(Debug, Default)]
pub struct CurrentLocationTool;

#[async_trait]
impl Tool for CurrentLocationTool {
    fn name(&self) -> &str {
        "getCurrentLocation"
    }

    fn description(&self) -> &str {
        "Get the device's current geographic location"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn call(&self, ctx: &ToolContext, _args: Value) -> Result<ToolReply, ToolError> {
        let location = ctx.location()?.current().await?;
        info!("location query answered");
        Ok(ToolReply::Messages(vec![ReplyMessage::location(
            location.latitude,
            location.longitude,
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::CurrentLocationTool;
    use crate::context::{ToolContext, TurnServices};
    use crate::reply::{ReplyMessage, ToolReply};
    use crate::services::{GeoLocation, LocationService};
    use crate::tool::Tool;
    use async_trait::async_trait;
    use chrono::DateTime;
    use daybook_protocol::ToolError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    struct StubLocation;

    #[async_trait]
    impl LocationService for StubLocation {
        async fn current(&self) -> Result<GeoLocation, ToolError> {
            Ok(GeoLocation {
                latitude: 47.6062,
                longitude: -122.3321,
            })
        }
    }

    struct DeniedLocation;

    #[async_trait]
    impl LocationService for DeniedLocation {
        async fn current(&self) -> Result<GeoLocation, ToolError> {
            Err(ToolError::PermissionDenied(
                "location access not granted".to_string(),
            ))
        }
    }

    fn context_with(service: Arc<dyn LocationService>) -> ToolContext {
        let services = TurnServices {
            location: Some(service),
            ..TurnServices::default()
        };
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").expect("timestamp");
        ToolContext::new(now, Arc::new(services))
    }

    #[tokio::test]
    async fn reports_a_location_message() {
        let ctx = context_with(Arc::new(StubLocation));
        let reply = CurrentLocationTool.call(&ctx, json!({})).await.expect("reply");
        assert_eq!(
            reply,
            ToolReply::Messages(vec![ReplyMessage::location(47.6062, -122.3321)])
        );
    }

    #[tokio::test]
    async fn permission_failures_propagate() {
        let ctx = context_with(Arc::new(DeniedLocation));
        let err = CurrentLocationTool
            .call(&ctx, json!({}))
            .await
            .expect_err("denied");
        assert!(matches!(err, ToolError::PermissionDenied(_)));
    }
}
