//! Contract tests run against every supported platform
//!
//! Each property holds for AWS, Azure and GCP alike: raw configs round-trip
//! through the dispatcher, extraction inverts injection, the receiver of an
//! injection never changes, and mixing platforms is always an error.

use cpms_common::crd::{
    AwsFailureDomain, AwsResourceFilter, AwsResourceReference, AzureFailureDomain, FailureDomain,
    GcpFailureDomain, MachineSpec, OpenShiftMachineV1Beta1MachineTemplate, PlatformType,
};
use cpms_common::Error;
use cpms_provider::constants::DISCRIMINATORS;
use cpms_provider::{new_provider_config, ProviderConfig};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn build(payload: Value) -> ProviderConfig {
    new_provider_config(&OpenShiftMachineV1Beta1MachineTemplate::new(payload))
        .expect("generated payload should dispatch")
}

fn arb_aws_zone() -> impl Strategy<Value = String> {
    "us-(east|west)-[12][a-f]"
}

fn arb_aws_subnet() -> impl Strategy<Value = AwsResourceReference> {
    let filter = ("tag:[A-Za-z]{1,8}", prop::collection::vec("[a-z0-9-]{1,12}", 1..3))
        .prop_map(|(name, values)| AwsResourceFilter { name, values });
    prop_oneof![
        "subnet-[0-9a-f]{8}".prop_map(|id| AwsResourceReference::id(id)),
        "arn:aws:ec2:us-east-1:[0-9]{12}:subnet/subnet-[0-9a-f]{8}"
            .prop_map(|arn| AwsResourceReference::arn(arn)),
        prop::collection::vec(filter, 1..3).prop_map(AwsResourceReference::filters),
    ]
}

/// Generate an AWS failure domain, with or without a subnet.
fn arb_aws_failure_domain() -> impl Strategy<Value = FailureDomain> {
    (arb_aws_zone(), prop::option::of(arb_aws_subnet())).prop_map(|(zone, subnet)| {
        let fd = AwsFailureDomain::new(zone);
        match subnet {
            Some(subnet) => fd.with_subnet(subnet).into(),
            None => fd.into(),
        }
    })
}

/// Generate an Azure failure domain, with or without a subnet.
fn arb_azure_failure_domain() -> impl Strategy<Value = FailureDomain> {
    ("[1-3]", prop::option::of("[a-z]{3,10}-subnet")).prop_map(|(zone, subnet)| {
        let fd = AzureFailureDomain::new(zone);
        match subnet {
            Some(subnet) => fd.with_subnet(subnet).into(),
            None => fd.into(),
        }
    })
}

fn arb_gcp_failure_domain() -> impl Strategy<Value = FailureDomain> {
    "(us|europe)-(central|west)[1-4]-[a-f]".prop_map(|zone| GcpFailureDomain::new(zone).into())
}

fn arb_failure_domain() -> impl Strategy<Value = FailureDomain> {
    prop_oneof![
        arb_aws_failure_domain(),
        arb_azure_failure_domain(),
        arb_gcp_failure_domain(),
    ]
}

fn arb_aws_payload() -> impl Strategy<Value = Value> {
    (
        prop_oneof![Just("m6i.xlarge"), Just("m6i.2xlarge"), Just("c5.4xlarge")],
        arb_aws_zone(),
        arb_aws_subnet(),
        any::<bool>(),
        "[a-z]{1,10}",
    )
        .prop_map(|(instance_type, zone, subnet, with_profile, tag)| {
            let mut payload = json!({
                "apiVersion": "machine.openshift.io/v1beta1",
                "kind": "AWSMachineProviderConfig",
                "ami": { "id": "ami-0123456789" },
                "instanceType": instance_type,
                "placement": { "region": "us-east-1", "availabilityZone": zone },
                "subnet": subnet_payload(&subnet),
                "tags": [{ "name": "owner", "value": tag }],
                "metadataServiceOptions": { "authentication": "Required" }
            });
            if with_profile {
                payload["iamInstanceProfile"] = json!({ "id": "cluster-master-profile" });
            }
            payload
        })
}

fn subnet_payload(subnet: &AwsResourceReference) -> Value {
    let mut out = serde_json::Map::new();
    if let Some(id) = &subnet.id {
        out.insert("id".into(), json!(id));
    }
    if let Some(arn) = &subnet.arn {
        out.insert("arn".into(), json!(arn));
    }
    if let Some(filters) = &subnet.filters {
        out.insert("filters".into(), json!(filters));
    }
    Value::Object(out)
}

fn arb_azure_payload() -> impl Strategy<Value = Value> {
    (
        prop::option::of("[1-3]"),
        "[a-z]{3,10}-subnet",
        prop_oneof![Just("Standard_D8s_v3"), Just("Standard_D16s_v3")],
    )
        .prop_map(|(zone, subnet, vm_size)| {
            let mut payload = json!({
                "apiVersion": "machine.openshift.io/v1beta1",
                "kind": "AzureMachineProviderSpec",
                "vmSize": vm_size,
                "location": "centralus",
                "subnet": subnet,
                "vnet": "cluster-vnet",
                "osDisk": { "diskSizeGB": 1024, "osType": "Linux" }
            });
            if let Some(zone) = zone {
                payload["zone"] = json!(zone);
            }
            payload
        })
}

fn arb_gcp_payload() -> impl Strategy<Value = Value> {
    (
        "us-central1-[a-f]",
        prop_oneof![Just("n2-standard-4"), Just("n2-standard-8")],
    )
        .prop_map(|(zone, machine_type)| {
            json!({
                "apiVersion": "machine.openshift.io/v1beta1",
                "kind": "GCPMachineProviderSpec",
                "machineType": machine_type,
                "region": "us-central1",
                "zone": zone,
                "projectID": "my-project",
                "disks": [{ "autoDelete": true, "boot": true, "sizeGb": 128 }]
            })
        })
}

/// Generate a provider config for any supported platform.
fn arb_provider_config() -> impl Strategy<Value = ProviderConfig> {
    prop_oneof![arb_aws_payload(), arb_azure_payload(), arb_gcp_payload()].prop_map(build)
}

/// Generate a provider config together with a failure domain of its platform.
fn arb_config_with_failure_domain() -> impl Strategy<Value = (ProviderConfig, FailureDomain)> {
    prop_oneof![
        (arb_aws_payload().prop_map(build), arb_aws_failure_domain()),
        (arb_azure_payload().prop_map(build), arb_azure_failure_domain()),
        (arb_gcp_payload().prop_map(build), arb_gcp_failure_domain()),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Raw configs re-parse into an equal config with identical bytes.
    #[test]
    fn raw_config_round_trips(config in arb_provider_config()) {
        let raw = config.raw_config().expect("raw config");
        let payload: Value = serde_json::from_slice(&raw).expect("raw config is JSON");
        let reparsed = build(payload);

        prop_assert_eq!(reparsed.platform_type(), config.platform_type());
        prop_assert!(reparsed.equal(&config).expect("same platform"));
        prop_assert_eq!(reparsed.raw_config().expect("raw config"), raw);
    }

    /// Extraction inverts injection; absent coordinates keep the config's own.
    #[test]
    fn extraction_inverts_injection((config, fd) in arb_config_with_failure_domain()) {
        let expected = fd.complete(&config.extract_failure_domain()).expect("same platform");
        let injected = config.inject_failure_domain(&fd).expect("same platform");
        let extracted = injected.extract_failure_domain();

        prop_assert!(
            extracted.equal(&expected).expect("same platform"),
            "extracted {} but expected {}", extracted, expected
        );
    }

    /// Injecting a config's own failure domain changes nothing.
    #[test]
    fn injecting_own_failure_domain_is_identity(config in arb_provider_config()) {
        let own = config.extract_failure_domain();
        let injected = config.inject_failure_domain(&own).expect("same platform");

        prop_assert!(injected.equal(&config).expect("same platform"));
        prop_assert_eq!(
            injected.raw_config().expect("raw config"),
            config.raw_config().expect("raw config")
        );
    }

    /// Injection never changes the receiver.
    #[test]
    fn injection_leaves_receiver_untouched(
        (config, fd) in arb_config_with_failure_domain(),
        (_, other) in arb_config_with_failure_domain(),
    ) {
        let snapshot = config.clone();
        let before = config.extract_failure_domain();

        let first = config.inject_failure_domain(&fd).expect("same platform");
        let second = config.inject_failure_domain(&fd.complete(&before).expect("same platform"));

        prop_assert_eq!(&config, &snapshot);
        prop_assert!(config.extract_failure_domain().equal(&before).expect("same platform"));
        prop_assert!(first.equal(&second.expect("same platform")).expect("same platform"));

        // a mismatched injection must not disturb it either
        let _ = config.inject_failure_domain(&other);
        prop_assert_eq!(&config, &snapshot);
    }

    /// Mixing platforms is always an error, never a boolean.
    #[test]
    fn cross_platform_operations_are_rejected(
        config in arb_provider_config(),
        other in arb_provider_config(),
        fd in arb_failure_domain(),
    ) {
        let platform = config.platform_type();

        let injected = config.inject_failure_domain(&fd);
        if fd.platform_type() == platform {
            prop_assert!(injected.is_ok());
        } else {
            let is_mismatch = matches!(
                injected,
                Err(Error::MismatchedPlatformTypes { expected, actual, .. })
                    if expected == platform && actual == fd.platform_type()
            );
            prop_assert!(is_mismatch);
        }

        let compared = config.equal(&other);
        if other.platform_type() == platform {
            prop_assert!(compared.is_ok());
        } else {
            let is_mismatch = matches!(compared, Err(Error::MismatchedPlatformTypes { .. }));
            prop_assert!(is_mismatch);
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch completeness
// ---------------------------------------------------------------------------

#[test]
fn every_discriminator_dispatches_to_its_platform() {
    for discriminator in DISCRIMINATORS {
        for group in discriminator.groups {
            let payload = json!({
                "apiVersion": format!("{group}/v1beta1"),
                "kind": discriminator.kind,
            });
            let result = new_provider_config(&OpenShiftMachineV1Beta1MachineTemplate::new(payload));

            if discriminator.platform.is_supported() {
                let config = result.expect("supported discriminator should dispatch");
                assert_eq!(config.platform_type(), discriminator.platform);
            } else {
                let err = result.expect_err("platform has no implementation");
                assert_eq!(err.reason(), "UnsupportedPlatformType");
                assert_eq!(err.platform(), Some(discriminator.platform.to_string()));
            }
        }
    }
}

#[rstest]
#[case::aws(PlatformType::Aws)]
#[case::azure(PlatformType::Azure)]
#[case::gcp(PlatformType::Gcp)]
fn platform_accessors_match_type(#[case] platform: PlatformType) {
    let kind = DISCRIMINATORS
        .iter()
        .find(|d| d.platform == platform)
        .map(|d| d.kind)
        .expect("supported platform has a discriminator");
    let config = build(json!({ "kind": kind }));

    assert_eq!(config.platform_type(), platform);
    assert_eq!(config.aws().is_some(), platform == PlatformType::Aws);
    assert_eq!(config.azure().is_some(), platform == PlatformType::Azure);
    assert_eq!(config.gcp().is_some(), platform == PlatformType::Gcp);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

const AWS_TEMPLATE: &str = r#"
failureDomains:
  platform: AWS
  aws:
    - placement:
        availabilityZone: us-east-1a
    - placement:
        availabilityZone: us-east-1b
metadata:
  labels:
    machine.openshift.io/cluster-api-machine-role: master
    machine.openshift.io/cluster-api-machine-type: master
spec:
  providerSpec:
    value:
      apiVersion: machine.openshift.io/v1beta1
      kind: AWSMachineProviderConfig
      ami:
        id: ami-0123456789
      instanceType: m6i.xlarge
      iamInstanceProfile:
        arn: arn:aws:iam::123456789012:instance-profile/cluster-master-profile
      placement:
        region: us-east-1
        availabilityZone: us-east-1a
      subnet:
        id: subnet-123
      userDataSecret:
        name: master-user-data
"#;

/// Story: the reconciler spreads a template across its failure domains
///
/// Each listed failure domain only names a zone, so every machine keeps the
/// template's subnet while its zone moves.
#[test]
fn story_spread_template_across_failure_domains() {
    let template: OpenShiftMachineV1Beta1MachineTemplate =
        serde_yaml::from_str(AWS_TEMPLATE).expect("template should parse");
    let config = new_provider_config(&template).expect("AWS config");

    let current = config.extract_failure_domain();
    let current = current.aws().expect("AWS failure domain");
    assert_eq!(current.placement.availability_zone, "us-east-1a");

    let failure_domains = template
        .failure_domains
        .as_ref()
        .expect("failure domains")
        .failure_domains()
        .expect("AWS failure domains");
    assert_eq!(failure_domains.len(), 2);

    let machine = config
        .inject_failure_domain(&failure_domains[1])
        .expect("injection should succeed");
    let extracted = machine.extract_failure_domain();
    assert_eq!(
        extracted.aws().map(|fd| fd.placement.availability_zone.as_str()),
        Some("us-east-1b")
    );

    let raw: Value =
        serde_json::from_slice(&machine.raw_config().expect("raw config")).expect("JSON");
    assert_eq!(raw["placement"]["availabilityZone"], "us-east-1b");
    assert_eq!(raw["subnet"]["id"], "subnet-123");

    let applied = machine.apply_to_template(&template);
    assert_eq!(applied.metadata, template.metadata);
    assert!(!config.equal(&new_provider_config(&applied).expect("AWS config")).expect("AWS"));
}

/// Story: a live machine whose controller resolved the instance profile is not drifted
#[test]
fn story_live_machine_with_resolved_profile_is_not_drifted() {
    let template: OpenShiftMachineV1Beta1MachineTemplate =
        serde_yaml::from_str(AWS_TEMPLATE).expect("template should parse");
    let desired = new_provider_config(&template).expect("AWS config");

    let mut live = desired.document().clone();
    live["iamInstanceProfile"]["id"] = json!("AIPAGENERATED");
    live["metadata"] = json!({ "creationTimestamp": "2024-05-01T10:00:00Z", "uid": "0b7c" });
    let live = ProviderConfig::from_machine_spec(&MachineSpec::with_provider_spec(live))
        .expect("live machine should parse");
    assert!(desired.equal(&live).expect("same platform"));

    let mut resized = desired.document().clone();
    resized["instanceType"] = json!("m6i.2xlarge");
    let resized = build(resized);
    assert!(!desired.equal(&resized).expect("same platform"));
    assert_eq!(
        desired.diff(&resized).expect("same platform"),
        vec![r#"instanceType: "m6i.xlarge" != "m6i.2xlarge""#.to_string()]
    );
}
