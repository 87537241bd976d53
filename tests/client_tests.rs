//! Contract tests for the channel and endpoint clients against a mock server.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/nfse` | `issue_*` |
//! | GET | `/nfse/{key}` | `fetch_*`, `non_*` |
//! | GET/HEAD | `/dps/{id}` | `head_*`, `dps_*` |
//! | POST/GET | `/nfse/{key}/eventos...` | `events_*` |
//! | GET | `/parametros_municipais/...` | `parameters_*` |

#![cfg(feature = "client")]

use std::time::Duration;

use chrono::DateTime;
use nfse::client::{ClientCertificate, NfseClient, NfseConfig};
use nfse::core::*;
use nfse::xml::{self, NFSE_NAMESPACE, XmlError};
use rust_decimal_macros::dec;
use wiremock::matchers::{any, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PEM: &str = include_str!("fixtures/client.pem");
const DPS_ID: &str = "355030821234567800019500001000000000000042";
const KEY: &str = "23044002212345678000195000000000000042240612345678";

fn config(base_url: &str) -> NfseConfig {
    NfseConfig::builder()
        .base_url(base_url)
        .certificate(ClientCertificate::from_pem(PEM).unwrap())
        .timeout_secs(5)
        .build()
        .unwrap()
}

fn client(server: &MockServer) -> NfseClient {
    NfseClient::new(config(&server.uri())).unwrap()
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn valid_dps() -> Dps {
    let at = DateTime::parse_from_rfc3339("2024-06-15T10:30:00-03:00").unwrap();
    DpsBuilder::new("1", "42")
        .provider(Provider {
            cnpj: Some("12345678000195".into()),
            municipal_registration: Some("998877".into()),
            municipality_code: Some("3550308".into()),
        })
        .recipient(RecipientBuilder::cnpj("98765432000110", "Cliente Ltda").build())
        .service("01.07", "Suporte técnico em informática")
        .values(DpsValues {
            service_amount: dec!(1000.00),
            deductions: dec!(0),
            tax_base: dec!(1000.00),
            rate: dec!(5),
            iss_amount: dec!(50.00),
            net_amount: dec!(950.00),
            tax_incentive: TaxIncentive::No,
        })
        .issued_at(at)
        .competence(at)
        .build()
        .unwrap()
}

// ── HEAD /dps/{id} ───────────────────────────────────────────────────

#[tokio::test]
async fn head_is_true_only_for_200() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(format!("/dps/{DPS_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let other = "355030821234567800019500001000000000000043";
    Mock::given(method("HEAD"))
        .and(path(format!("/dps/{other}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let no_content = "355030821234567800019500001000000000000044";
    Mock::given(method("HEAD"))
        .and(path(format!("/dps/{no_content}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.dps().nfse_exists(DPS_ID).await.unwrap());
    assert!(!client.dps().nfse_exists(other).await.unwrap());
    assert!(!client.dps().nfse_exists(no_content).await.unwrap());
}

#[tokio::test]
async fn dps_access_key_returns_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/dps/{DPS_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(KEY))
        .mount(&server)
        .await;

    let key = client(&server).dps().access_key(DPS_ID).await.unwrap();
    assert_eq!(key, KEY);
}

#[tokio::test]
async fn dps_id_is_checked_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.dps().nfse_exists(&DPS_ID[..41]).await.unwrap_err();
    assert_eq!(err.violations()[0].field, "dps_id");
    // registration-type digit 3
    let bad_type = "355030831234567800019500001000000000000042";
    assert!(matches!(
        client.dps().access_key(bad_type).await,
        Err(NfseError::Validation(_))
    ));
}

// ── GET /nfse/{key} ──────────────────────────────────────────────────

#[tokio::test]
async fn fetch_parses_issued_document() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<NFSe xmlns="{NFSE_NAMESPACE}">
  <infNfse Id="{KEY}">
    <nNfse>42</nNfse>
    <cVerif>ABC123</cVerif>
    <situacao>1</situacao>
  </infNfse>
</NFSe>"#
    );
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let nfse = client(&server).issuance().fetch(KEY).await.unwrap();
    let inf = nfse.inf_nfse.unwrap();
    assert_eq!(inf.access_key.as_deref(), Some(KEY));
    assert_eq!(inf.number.as_deref(), Some("42"));
    assert_eq!(inf.status, NfseStatus::Normal);
}

#[tokio::test]
async fn fetch_with_49_char_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .issuance()
        .fetch(&KEY[..49])
        .await
        .unwrap_err();
    assert!(matches!(err, NfseError::Validation(_)));
    assert_eq!(err.violations()[0].field, "access_key");
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw("<erro>falha interna</erro>", "application/xml"),
        )
        .mount(&server)
        .await;

    let err = client(&server).issuance().fetch(KEY).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert_eq!(transport.status(), Some(500));
    assert_eq!(transport.body(), Some("<erro>falha interna</erro>"));
}

#[tokio::test]
async fn non_xml_content_type_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
        .mount(&server)
        .await;

    let err = client(&server).issuance().fetch(KEY).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert_eq!(transport.status(), Some(200));
    assert!(transport.message.contains("application/json"));
}

#[tokio::test]
async fn unparsable_success_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(xml_response("<NFSe><infNfse>".into()))
        .mount(&server)
        .await;

    let err = client(&server).issuance().fetch(KEY).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert_eq!(transport.status(), Some(200));
    assert_eq!(transport.body(), Some("<NFSe><infNfse>"));
    assert!(matches!(
        transport.find_cause::<XmlError>(),
        Some(XmlError::MalformedXml(_))
    ));
}

#[tokio::test]
async fn fetch_xml_returns_body_verbatim() {
    let server = MockServer::start().await;
    let body = format!(r#"<NFSe xmlns="{NFSE_NAMESPACE}"><infNfse/></NFSe>"#);
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(xml_response(body.clone()))
        .mount(&server)
        .await;

    assert_eq!(client(&server).issuance().fetch_xml(KEY).await.unwrap(), body);
}

// ── POST /nfse ───────────────────────────────────────────────────────

#[tokio::test]
async fn issue_posts_xml_and_parses_reply() {
    let server = MockServer::start().await;
    let reply = format!(
        r#"<RespostaNFSe xmlns="{NFSE_NAMESPACE}">
  <status>AUTORIZADA</status>
  <NFSe><infNfse Id="{KEY}"><situacao>1</situacao></infNfse></NFSe>
</RespostaNFSe>"#
    );
    Mock::given(method("POST"))
        .and(path("/nfse"))
        .and(header("content-type", "application/xml; charset=utf-8"))
        .and(header("user-agent", "nfse/1.01"))
        .and(body_string_contains(format!(r#"<infDps Id="{DPS_ID}">"#)))
        .respond_with(xml_response(reply))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server)
        .issuance()
        .issue(&valid_dps())
        .await
        .unwrap();
    assert_eq!(resp.status.as_deref(), Some("AUTORIZADA"));
    let inf = resp.nfse.and_then(|n| n.inf_nfse).unwrap();
    assert_eq!(inf.access_key.as_deref(), Some(KEY));
}

#[tokio::test]
async fn issue_reports_every_missing_recipient_field() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut dps = valid_dps();
    let recipient = dps
        .inf_dps
        .as_mut()
        .and_then(|inf| inf.recipient.as_mut())
        .unwrap();
    recipient.name = None;
    recipient.registration_number = None;

    let err = client(&server).issuance().issue(&dps).await.unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"inf_dps.recipient.name"), "{fields:?}");
    assert!(
        fields.contains(&"inf_dps.recipient.registration_number"),
        "{fields:?}"
    );
}

#[tokio::test]
async fn issue_xml_returns_raw_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nfse"))
        .and(body_string_contains("<Signature>"))
        .respond_with(xml_response("<RespostaNFSe/>".into()))
        .mount(&server)
        .await;

    let client = client(&server);
    let raw = client
        .issuance()
        .issue_xml("<Dps><Signature>sig</Signature></Dps>")
        .await
        .unwrap();
    assert_eq!(raw, "<RespostaNFSe/>");
    assert!(client.issuance().issue_xml("  ").await.is_err());
}

// ── Events ───────────────────────────────────────────────────────────

#[tokio::test]
async fn events_register_cancellation() {
    let server = MockServer::start().await;
    let reply = format!(
        r#"<RespostaEvento xmlns="{NFSE_NAMESPACE}"><status>REGISTRADO</status></RespostaEvento>"#
    );
    Mock::given(method("POST"))
        .and(path(format!("/nfse/{KEY}/eventos")))
        .and(body_string_contains("<tpEvento>e101101</tpEvento>"))
        .respond_with(xml_response(reply))
        .expect(1)
        .mount(&server)
        .await;

    let at = DateTime::parse_from_rfc3339("2024-07-01T08:00:00-03:00").unwrap();
    let request = EventRegistrationRequest::cancellation(KEY, "1", "Erro na emissão", at).unwrap();
    let resp = client(&server)
        .events()
        .register(KEY, &request)
        .await
        .unwrap();
    assert_eq!(resp.status.as_deref(), Some("REGISTRADO"));
    assert!(resp.messages.is_empty());
}

#[tokio::test]
async fn events_list_by_type_uses_wire_code() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<ListaEventos xmlns="{NFSE_NAMESPACE}">
  <Evento><infEvento Id="E1"><chNfse>{KEY}</chNfse><tpEvento>e202102</tpEvento><nSeqEvento>1</nSeqEvento></infEvento></Evento>
  <Evento><infEvento Id="E2"><chNfse>{KEY}</chNfse><tpEvento>e202102</tpEvento><nSeqEvento>2</nSeqEvento></infEvento></Evento>
</ListaEventos>"#
    );
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}/eventos/e202102")))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let list = client(&server)
        .events()
        .list_by_type(KEY, EventType::RecipientConfirmation)
        .await
        .unwrap();
    let seqs: Vec<u32> = list
        .events
        .iter()
        .filter_map(|e| e.inf_event.as_ref())
        .map(|inf| inf.sequence)
        .collect();
    assert_eq!(seqs, [1, 2]);
}

#[tokio::test]
async fn events_get_rejects_zero_sequence() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .events()
        .get(KEY, EventType::CancellationRequest, 0)
        .await
        .unwrap_err();
    assert_eq!(err.violations()[0].field, "sequence");
}

#[tokio::test]
async fn events_get_single_event() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<Evento xmlns="{NFSE_NAMESPACE}"><infEvento><tpEvento>e305102</tpEvento><nSeqEvento>3</nSeqEvento></infEvento></Evento>"#
    );
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}/eventos/e305102/3")))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let event = client(&server)
        .events()
        .get(KEY, EventType::Block, 3)
        .await
        .unwrap();
    let inf = event.inf_event.unwrap();
    assert_eq!(inf.event_type, Some(EventType::Block));
    assert_eq!(inf.sequence, 3);
}

// ── Municipal parameters ─────────────────────────────────────────────

#[tokio::test]
async fn parameters_withholdings_normalizes_tax_id() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<ParametrosRetencoes xmlns="{NFSE_NAMESPACE}">
  <cMun>2304400</cMun><tpInsc>2</tpInsc><nInsc>12345678000195</nInsc>
  <retPIS>2</retPIS><retCOFINS>2</retCOFINS><retINSS>1</retINSS><retIR>2</retIR><retCSLL>1</retCSLL>
</ParametrosRetencoes>"#
    );
    Mock::given(method("GET"))
        .and(path("/parametros_municipais/2304400/12345678000195/retencoes"))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let params = client(&server)
        .parameters()
        .withholdings("2304400", "12.345.678/0001-95")
        .await
        .unwrap();
    assert_eq!(params.registration_type, RegistrationType::Cnpj);
    assert!(params.pis.is_yes());
    assert!(!params.inss.is_yes());
}

#[tokio::test]
async fn parameters_reject_bad_identifiers_locally() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let params = client.parameters();
    assert!(params.agreement("230440").await.is_err());
    assert!(params.benefits("2304400", "123").await.is_err());
    assert!(params.service_rates("2304400", " ").await.is_err());
}

#[tokio::test]
async fn parameters_agreement_and_service_rates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parametros_municipais/2304400/convenio"))
        .respond_with(xml_response(format!(
            r#"<ParametrosConvenio xmlns="{NFSE_NAMESPACE}"><cMun>2304400</cMun><sitConv>1</sitConv></ParametrosConvenio>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/parametros_municipais/2304400/01.07"))
        .respond_with(xml_response(format!(
            r#"<ParametrosServico xmlns="{NFSE_NAMESPACE}"><cServ>01.07</cServ><aliq>5</aliq><aliqMin>2</aliqMin><aliqMax>5</aliqMax></ParametrosServico>"#
        )))
        .mount(&server)
        .await;

    let client = client(&server);
    let agreement = client.parameters().agreement("2304400").await.unwrap();
    assert_eq!(agreement.agreement_status, AgreementStatus::Active);
    let rates = client
        .parameters()
        .service_rates("2304400", "01.07")
        .await
        .unwrap();
    assert_eq!(rates.rate, dec!(5));
    assert_eq!(rates.min_rate, dec!(2));
    assert!(rates.special_regime.is_none());
}

// ── Path encoding ────────────────────────────────────────────────────

async fn seen_paths(server: &MockServer) -> Vec<(String, Option<String>)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| (r.url.path().to_string(), r.url.query().map(str::to_string)))
        .collect()
}

#[tokio::test]
async fn access_key_cannot_escape_its_path_segment() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(xml_response("<x/>".into()))
        .mount(&server)
        .await;

    let key = "../parametros_municipais/2304400/convenio?xxxxxxxx";
    assert_eq!(key.len(), 50);
    client(&server).issuance().fetch_xml(key).await.unwrap();

    assert_eq!(
        seen_paths(&server).await,
        vec![(
            "/nfse/..%2Fparametros_municipais%2F2304400%2Fconvenio%3Fxxxxxxxx".to_string(),
            None
        )]
    );
}

#[tokio::test]
async fn service_code_cannot_traverse_to_another_endpoint() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let _ = client
        .parameters()
        .service_rates("2304400", "01.07/../../../nfse")
        .await;
    assert_eq!(
        seen_paths(&server).await,
        vec![(
            "/parametros_municipais/2304400/01.07%2F..%2F..%2F..%2Fnfse".to_string(),
            None
        )]
    );

    let err = client
        .parameters()
        .service_rates("2304400", "..")
        .await
        .unwrap_err();
    assert!(matches!(err, NfseError::Validation(_)));
    assert_eq!(seen_paths(&server).await.len(), 1);
}

// ── Channel behavior ─────────────────────────────────────────────────

#[tokio::test]
async fn non_utf8_body_is_reported_not_silently_replaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/nfse/{KEY}")))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw(b"<erro>\xe7\xe3o</erro>".to_vec(), "application/xml"),
        )
        .mount(&server)
        .await;

    let err = client(&server).issuance().fetch_xml(KEY).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert_eq!(transport.status(), Some(500));
    assert!(transport.message.contains("not valid UTF-8"));
    assert!(transport.find_cause::<std::string::FromUtf8Error>().is_some());
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(format!("/contribuintes/dps/{DPS_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = NfseClient::new(config(&format!("{}/contribuintes", server.uri()))).unwrap();
    assert!(client.dps().nfse_exists(DPS_ID).await.unwrap());
}

#[tokio::test]
async fn closed_client_fails_with_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let shared = client.clone();
    client.close();
    let err = shared.dps().nfse_exists(DPS_ID).await.unwrap_err();
    assert!(matches!(err, NfseError::Configuration(ref m) if m == "channel is closed"));
}

#[tokio::test]
async fn timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = NfseConfig::builder()
        .base_url(server.uri())
        .certificate(ClientCertificate::from_pem(PEM).unwrap())
        .timeout_secs(1)
        .build()
        .unwrap();
    let err = NfseClient::new(config)
        .unwrap()
        .issuance()
        .fetch_xml(KEY)
        .await
        .unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert!(transport.is_timeout());
    assert_eq!(transport.status(), None);
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = NfseClient::new(config(&format!("http://127.0.0.1:{port}"))).unwrap();
    let err = client.dps().nfse_exists(DPS_ID).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert!(transport.status().is_none());
    assert!(transport.body().is_none());
    assert!(transport.is_connect());
}

#[tokio::test]
async fn invalid_configuration_never_builds_a_client() {
    let err = NfseConfig::builder().timeout_secs(0).build().unwrap_err();
    let NfseError::Configuration(msg) = err else {
        panic!("expected configuration error");
    };
    assert!(msg.contains("client certificate is required"));
    assert!(msg.contains("timeout must be greater than zero"));
}

#[test]
fn request_documents_serialize_without_network() {
    let xml = xml::to_xml(&valid_dps()).unwrap();
    assert!(xml.contains("<xNome>Cliente Ltda</xNome>"));
}

// ── Server certificate trust ──

/// HTTPS server on loopback presenting the self-signed fixture certificate.
/// Every connection that completes the handshake gets an empty 200.
async fn self_signed_server() -> String {
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio_rustls::TlsAcceptor;
    use tokio_rustls::rustls::pki_types::pem::PemObject;
    use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
    use tokio_rustls::rustls::{ServerConfig, crypto};

    let certs = CertificateDer::pem_slice_iter(PEM.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = PrivateKeyDer::from_pem_slice(PEM.as_bytes()).unwrap();
    let tls = ServerConfig::builder_with_provider(Arc::new(crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(tls));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let Ok(mut stream) = acceptor.accept(tcp).await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                    .await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("https://127.0.0.1:{port}")
}

#[tokio::test]
async fn self_signed_server_is_refused_by_default() {
    let base = self_signed_server().await;
    let strict = NfseClient::new(config(&base)).unwrap();
    let err = strict.dps().nfse_exists(DPS_ID).await.unwrap_err();
    let transport = err.as_transport().expect("transport error");
    assert!(transport.is_connect(), "{err}");
    assert_eq!(transport.status(), None);
}

#[tokio::test]
async fn self_signed_server_is_accepted_when_validation_is_off() {
    let base = self_signed_server().await;
    let relaxed_config = NfseConfig::builder()
        .base_url(&base)
        .certificate(ClientCertificate::from_pem(PEM).unwrap())
        .validate_server_certificate(false)
        .timeout_secs(5)
        .build()
        .unwrap();
    let relaxed = NfseClient::new(relaxed_config).unwrap();
    assert!(relaxed.dps().nfse_exists(DPS_ID).await.unwrap());
}
