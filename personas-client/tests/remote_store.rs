//! `RemoteStore` against a mock `/personas` backend.

use personas_client::{PersonApi, RemoteStore, NETWORK_FAILURE_MESSAGE};
use personas_core::{ClientConfig, Direccion, Person, Rut};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn person() -> Person {
    Person {
        rut: Rut::from("12345678-5"),
        nombre: "Ana".into(),
        apellido: "Rojas".into(),
        fecha_nacimiento: "15-03-1990".into(),
        direccion: Direccion {
            calle: "Av. Matta 123".into(),
            comuna: "Santiago".into(),
            region: "Metropolitana".into(),
        },
    }
}

fn store_for(server: &MockServer) -> RemoteStore {
    RemoteStore::new(&ClientConfig {
        api_url: server.uri(),
        timeout_secs: Some(5),
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn create_passes_payload_and_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/personas"))
        .and(body_json(json!({
            "rut": "12345678-5",
            "nombre": "Ana",
            "apellido": "Rojas",
            "fechaNacimiento": "15-03-1990",
            "direccion": {"calle": "Av. Matta 123", "comuna": "Santiago", "region": "Metropolitana"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&person()))
        .expect(1)
        .mount(&server)
        .await;

    let resp = store_for(&server).create(&person()).await;
    assert_eq!(resp.status, 201);
    assert_eq!(resp.data, Some(person()));
    assert_eq!(resp.message, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn accepted_update_keeps_202() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/personas/12345678-5"))
        .respond_with(ResponseTemplate::new(202).set_body_json(&person()))
        .mount(&server)
        .await;

    let resp = store_for(&server)
        .update(&Rut::from("12345678-5"), &person())
        .await;
    assert_eq!(resp.status, 202);
    assert!(resp.data.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn conflict_body_is_folded_into_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/personas"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "El RUT 12345678-5 ya existe",
            "error": "Conflict",
            "statusCode": 409
        })))
        .mount(&server)
        .await;

    let resp = store_for(&server).create(&person()).await;
    assert_eq!(resp.status, 409);
    assert_eq!(resp.data, None);
    assert_eq!(resp.message.as_deref(), Some("El RUT 12345678-5 ya existe"));
    assert_eq!(resp.error.as_deref(), Some("Conflict"));
    assert_eq!(resp.status_code, Some(409));
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_without_body_has_no_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/personas"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resp = store_for(&server).get_all().await;
    assert_eq!(resp.status, 503);
    assert_eq!(resp.backend_message(), None);
    assert_eq!(resp.message_or_default(), "Ocurrió un error");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/personas/1-9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = store_for(&server).delete(&Rut::from("1-9")).await;
    assert_eq!(resp.status, 204);
    assert_eq!(resp.data, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_all_decodes_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/personas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![person()]))
        .mount(&server)
        .await;

    let resp = store_for(&server).get_all().await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, Some(vec![person()]));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_success_body_yields_no_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/personas/12345678-5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let resp = store_for(&server).get_one(&Rut::from("12345678-5")).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_host_is_status_zero() {
    // Nothing listens on port 1; the connection is refused.
    let store = RemoteStore::new(&ClientConfig {
        api_url: "http://127.0.0.1:1".into(),
        timeout_secs: Some(2),
    });
    let resp = store.get_all().await;
    assert_eq!(resp.status, 0);
    assert!(resp.is_network_failure());
    assert_eq!(resp.message.as_deref(), Some(NETWORK_FAILURE_MESSAGE));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_body_over_ten_megabytes_is_read_in_full() {
    let mut big = person();
    big.nombre = "a".repeat(11 * 1024 * 1024);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/personas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![big.clone(), person()]))
        .mount(&server)
        .await;

    let resp = RemoteStore::new(&ClientConfig {
        api_url: server.uri(),
        timeout_secs: Some(30),
    })
    .get_all()
    .await;
    assert_eq!(resp.status, 200);
    let data = resp.data.expect("payload survives a large body");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].nombre.len(), big.nombre.len());
}
