//! AWS SDK client construction.

use aws_config::BehaviorVersion;

/// Build the KMS client used by the gateway.
///
/// Credentials and region come from the standard AWS provider chain
/// (environment, profile, IMDS / IRSA). When `endpoint_url` is set, every
/// call is sent there instead of the regional KMS endpoint, which is how
/// KMS-compatible emulators are targeted.
pub async fn kms_client(endpoint_url: Option<&str>) -> aws_sdk_kms::Client {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

    let mut builder = aws_sdk_kms::config::Builder::from(&config);
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url);
    }
    aws_sdk_kms::Client::from_conf(builder.build())
}
