use std::sync::{Arc, Mutex};

use registry_client::{ClientError, ClientResult};
use registry_config::{ConfigValue, EffectiveConfig};
use registry_tls::{
    SslSocketFactory, TlsContext, TlsError, TlsResult, default_client_config,
};
use registry_transport::{TransportError, TransportResult};

use super::*;

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Configure(EffectiveConfig),
    BuildContext,
    Obtain,
    InstallSocketFactory,
    Create {
        capacity: usize,
        config: EffectiveConfig,
    },
}

type Log = Arc<Mutex<Vec<Event>>>;

fn record(log: &Log, event: Event) {
    log.lock().expect("log lock").push(event);
}

fn events(log: &Log) -> Vec<Event> {
    log.lock().expect("log lock").clone()
}

struct RecordingTlsBuilder {
    log: Log,
    built: Arc<Mutex<Vec<TlsContext>>>,
    fail_build: bool,
}

impl TlsContextBuilder for RecordingTlsBuilder {
    fn configure(&mut self, config: &EffectiveConfig) -> TlsResult<()> {
        record(&self.log, Event::Configure(config.clone()));
        Ok(())
    }

    fn build_context(&self) -> TlsResult<TlsContext> {
        record(&self.log, Event::BuildContext);
        if self.fail_build {
            return Err(TlsError::configuration("keystore password rejected"));
        }
        let context = TlsContext::new(Arc::new(default_client_config()));
        self.built.lock().expect("built lock").push(context.clone());
        Ok(context)
    }
}

#[derive(Debug)]
struct RecordingTransport {
    log: Log,
    installed: Vec<SslSocketFactory>,
}

impl TransportHandle for RecordingTransport {
    fn set_ssl_socket_factory(&mut self, factory: SslSocketFactory) {
        record(&self.log, Event::InstallSocketFactory);
        self.installed.push(factory);
    }
}

#[derive(Debug)]
struct CreatedClient {
    transport: RecordingTransport,
    capacity: usize,
    config: EffectiveConfig,
}

struct Harness {
    log: Log,
    built: Arc<Mutex<Vec<TlsContext>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            log: Arc::default(),
            built: Arc::default(),
        }
    }

    fn tls_builder(&self, fail_build: bool) -> RecordingTlsBuilder {
        RecordingTlsBuilder {
            log: Arc::clone(&self.log),
            built: Arc::clone(&self.built),
            fail_build,
        }
    }

    fn supplier(&self) -> impl Fn() -> TransportResult<RecordingTransport> {
        let log = Arc::clone(&self.log);
        move || {
            record(&log, Event::Obtain);
            Ok(RecordingTransport {
                log: Arc::clone(&log),
                installed: Vec::new(),
            })
        }
    }

    fn client_factory(
        &self,
    ) -> impl Fn(RecordingTransport, usize, &EffectiveConfig) -> ClientResult<CreatedClient>
    {
        let log = Arc::clone(&self.log);
        move |transport, capacity, config| {
            record(
                &log,
                Event::Create {
                    capacity,
                    config: config.clone(),
                },
            );
            Ok(CreatedClient {
                transport,
                capacity,
                config: config.clone(),
            })
        }
    }

    fn factory(
        &self,
        config: Config,
    ) -> RegistryClientFactory<
        impl Fn() -> TransportResult<RecordingTransport>,
        RecordingTlsBuilder,
        impl Fn(RecordingTransport, usize, &EffectiveConfig) -> ClientResult<CreatedClient>,
    > {
        RegistryClientFactory::with_collaborators(
            Arc::new(config),
            self.supplier(),
            self.tls_builder(false),
            self.client_factory(),
        )
    }

    fn built(&self) -> Vec<TlsContext> {
        self.built.lock().expect("built lock").clone()
    }
}

fn config<const N: usize>(entries: [(&str, &str); N]) -> Config {
    entries.into_iter().collect()
}

fn effective<const N: usize>(entries: [(&str, &str); N]) -> EffectiveConfig {
    entries.into_iter().collect()
}

fn expected_sequence(resolved: &EffectiveConfig) -> Vec<Event> {
    vec![
        Event::Configure(resolved.clone()),
        Event::BuildContext,
        Event::Obtain,
        Event::InstallSocketFactory,
        Event::Create {
            capacity: SCHEMA_REGISTRY_CACHE_CAPACITY,
            config: resolved.clone(),
        },
    ]
}

#[test]
fn sets_socket_factory_when_no_specific_ssl_config() {
    let harness = Harness::new();
    let mut factory = harness.factory(Config::empty());

    let client = factory.get().unwrap();

    assert_eq!(events(&harness.log), expected_sequence(&EffectiveConfig::default()));
    let built = harness.built();
    assert_eq!(built.len(), 1);
    assert_eq!(client.transport.installed.len(), 1);
    assert!(client.transport.installed[0].derived_from(&built[0]));
    assert_eq!(client.capacity, SCHEMA_REGISTRY_CACHE_CAPACITY);
}

#[test]
fn picks_up_non_prefixed_ssl_config() {
    let harness = Harness::new();
    let mut factory = harness.factory(config([("ssl.protocol", "SSLv3")]));

    factory.get().unwrap();

    assert_eq!(
        events(&harness.log),
        expected_sequence(&effective([("ssl.protocol", "SSLv3")]))
    );
}

#[test]
fn picks_up_prefixed_ssl_config() {
    let harness = Harness::new();
    let mut factory = harness.factory(config([("ksql.schema.registry.ssl.protocol", "SSLv3")]));

    factory.get().unwrap();

    assert_eq!(
        events(&harness.log),
        expected_sequence(&effective([("ssl.protocol", "SSLv3")]))
    );
}

#[test]
fn prefixed_ssl_config_wins_over_ambient() {
    let harness = Harness::new();
    let mut factory = harness.factory(config([
        ("ssl.protocol", "TLSv1.2"),
        ("ksql.schema.registry.ssl.protocol", "SSLv3"),
        ("ksql.streams.ssl.protocol", "TLSv1.1"),
    ]));

    let client = factory.get().unwrap();

    assert_eq!(client.config, effective([("ssl.protocol", "SSLv3")]));
}

#[test]
fn passes_basic_auth_credentials_to_client_factory() {
    let harness = Harness::new();
    let mut factory = harness.factory(config([
        ("ksql.schema.registry.basic.auth.credentials.source", "USER_INFO"),
        ("ksql.schema.registry.basic.auth.user.info", "username:password"),
    ]));

    let client = factory.get().unwrap();

    assert_eq!(
        client.config,
        effective([
            ("basic.auth.credentials.source", "USER_INFO"),
            ("basic.auth.user.info", "username:password"),
        ])
    );
}

#[test]
fn transport_is_not_obtained_at_construction() {
    let harness = Harness::new();
    let _factory = harness.factory(Config::empty());

    assert!(events(&harness.log).is_empty());
}

#[test]
fn client_factory_failure_is_propagated() {
    let harness = Harness::new();
    let log = Arc::clone(&harness.log);
    let mut factory = RegistryClientFactory::with_collaborators(
        Arc::new(Config::empty()),
        harness.supplier(),
        harness.tls_builder(false),
        move |_transport: RecordingTransport, _capacity: usize, _config: &EffectiveConfig| {
            record(
                &log,
                Event::Create {
                    capacity: 0,
                    config: EffectiveConfig::default(),
                },
            );
            Err::<CreatedClient, _>(ClientError::construction("registry client rejected"))
        },
    );

    let err = factory.get().expect_err("client factory fails");

    match err {
        FactoryError::Client(ClientError::Construction { reason }) => {
            assert_eq!(reason, "registry client rejected");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn tls_failure_stops_before_transport_is_obtained() {
    let harness = Harness::new();
    let mut factory = RegistryClientFactory::with_collaborators(
        Arc::new(Config::empty()),
        harness.supplier(),
        harness.tls_builder(true),
        harness.client_factory(),
    );

    let err = factory.get().expect_err("TLS build fails");

    assert!(matches!(
        err,
        FactoryError::Tls(TlsError::Configuration { .. })
    ));
    assert_eq!(
        events(&harness.log),
        vec![
            Event::Configure(EffectiveConfig::default()),
            Event::BuildContext
        ]
    );
}

#[test]
fn transport_failure_skips_client_factory() {
    let harness = Harness::new();
    let mut factory = RegistryClientFactory::with_collaborators(
        Arc::new(Config::empty()),
        || -> TransportResult<RecordingTransport> { Err(TransportError::NoBaseUrls) },
        harness.tls_builder(false),
        harness.client_factory(),
    );

    let err = factory.get().expect_err("transport fails");

    assert!(matches!(
        err,
        FactoryError::Transport(TransportError::NoBaseUrls)
    ));
    assert!(
        !events(&harness.log)
            .iter()
            .any(|event| matches!(event, Event::Create { .. }))
    );
}

#[test]
fn repeated_calls_are_independent_and_deterministic() {
    let harness = Harness::new();
    let mut factory = harness.factory(config([
        ("ksql.schema.registry.url", "https://registry:8081"),
        ("ssl.protocol", "TLSv1.2"),
    ]));

    let first = factory.get().unwrap();
    let second = factory.get().unwrap();

    assert_eq!(first.config, second.config);
    let resolved = effective([("ssl.protocol", "TLSv1.2"), ("url", "https://registry:8081")]);
    let mut expected = expected_sequence(&resolved);
    expected.extend(expected_sequence(&resolved));
    assert_eq!(events(&harness.log), expected);

    let built = harness.built();
    assert_eq!(built.len(), 2);
    assert_eq!(first.transport.installed.len(), 1);
    assert_eq!(second.transport.installed.len(), 1);
    assert!(first.transport.installed[0].derived_from(&built[0]));
    assert!(second.transport.installed[0].derived_from(&built[1]));
    assert!(!second.transport.installed[0].derived_from(&built[0]));
}

#[test]
fn non_string_values_reach_collaborators_unchanged() {
    let harness = Harness::new();
    let config: Config = [
        ("ksql.schema.registry.max.retries", ConfigValue::Int(3)),
        ("ksql.schema.registry.auto.register", ConfigValue::Bool(false)),
    ]
    .into_iter()
    .collect();
    let mut factory = harness.factory(config);

    let client = factory.get().unwrap();

    assert_eq!(client.config.get("max.retries"), Some(&ConfigValue::Int(3)));
    assert_eq!(
        client.config.get("auto.register"),
        Some(&ConfigValue::Bool(false))
    );
}

#[test]
fn production_factory_defers_url_validation() {
    let config: Config = [("ksql.schema.registry.url", "not a url")]
        .into_iter()
        .collect();
    let mut factory = RegistryClientFactory::new(Arc::new(config)).unwrap();

    let err = factory.get().expect_err("invalid URL");

    assert!(matches!(
        err,
        FactoryError::Transport(TransportError::InvalidUrl { .. })
    ));
}
