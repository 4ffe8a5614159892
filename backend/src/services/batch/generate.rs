use crate::config::AppConfig;
use crate::services::batch::encode::encode;
use crate::services::batch::error::BatchError;
use crate::services::batch::normalize::normalize;
use crate::services::batch::params::BatchParameters;
use crate::services::batch::sheet::read_table;
use crate::services::batch::upload::read_upload;
use actix_multipart::Multipart;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};

/// Name of the downloaded artifact.
pub const FILE_NAME: &str = "dados.txt";

/// Actix handler for `POST /api/batch/generate`.
///
/// Runs the whole upload -> normalize -> encode pass for one request.
///
/// - On success: `200 OK`, `text/plain` attachment named `dados.txt`.
/// - On failure: `400 Bad Request` with the error message and no file.
pub(crate) async fn process(config: web::Data<AppConfig>, payload: Multipart) -> impl Responder {
    match generate_batch(payload, config.max_upload_bytes).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header(ContentDisposition::attachment(FILE_NAME))
            .body(body),
        Err(e) => {
            warn!("Generation rejected: {}", e);
            HttpResponse::BadRequest().body(format!("Error: {}", e))
        }
    }
}

async fn generate_batch(payload: Multipart, max_bytes: usize) -> Result<Vec<u8>, BatchError> {
    let upload = read_upload(payload, max_bytes).await?;
    let form = upload.form.ok_or(BatchError::MissingPart("json"))?;

    let table = read_table(&upload.file_name, upload.bytes)?;
    let rows = normalize(table)?;
    let params = BatchParameters::try_from(form)?;
    let body = encode(&rows, &params)?;

    info!(
        "Generated {} with {} lines ({} / {:?})",
        FILE_NAME,
        rows.len(),
        params.operation(),
        params.value_mode()
    );
    Ok(body)
}

#[cfg(test)]
mod tests {
    use crate::services::batch::test_support::{batch_app, multipart_request, Part};
    use actix_web::http::header;
    use actix_web::test;

    const SHEET: &[u8] = b"1234567;123.456.789-00;12.0;150.5;NOTE\n\
7654321;123.456.789-00;15;20;SEGUNDA\n";

    const FORM: &str = r#"{
        "operation": "I - Inclusão",
        "right_start": "202401",
        "right_end": "",
        "installment_count": "",
        "value_mode": "Valor",
        "document": "DOC1"
    }"#;

    #[actix_web::test]
    async fn downloads_fixed_width_file() {
        let app = test::init_service(batch_app(4096)).await;
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::json(FORM), Part::file("lote.csv", SHEET)],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert!(resp.status().is_success());

        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("dados.txt"));
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));

        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("I1010202401      00012345671234567890000001201  "));
        assert!(lines[0].ends_with("000015050DOC1           NOTE"));
        assert_eq!(&lines[1][44..46], "02");
        assert!(text.ends_with('\n'));
    }

    #[actix_web::test]
    async fn parts_may_arrive_in_any_order() {
        let app = test::init_service(batch_app(4096)).await;
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::file("lote.csv", SHEET), Part::json(FORM)],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn missing_start_period_blocks_generation() {
        let app = test::init_service(batch_app(4096)).await;
        let form = FORM.replace(r#""right_start": "202401""#, r#""right_start": """#);
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::json(&form), Part::file("lote.csv", SHEET)],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 400);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("'right_start' is required"));
    }

    #[actix_web::test]
    async fn missing_form_part_is_reported() {
        let app = test::init_service(batch_app(4096)).await;
        let req = multipart_request("/api/batch/generate", &[Part::file("lote.csv", SHEET)]);

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 400);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("missing multipart field 'json'"));
    }

    #[actix_web::test]
    async fn invalid_value_produces_no_file() {
        let app = test::init_service(batch_app(4096)).await;
        let sheet = b"1;11111111111;1;10;OK\n2;22222222222;1;dez;RUIM\n";
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::json(FORM), Part::file("lote.csv", sheet)],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 400);
        assert!(resp.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("row 2: invalid value"));
    }

    #[actix_web::test]
    async fn oversized_form_part_is_rejected() {
        let app = test::init_service(batch_app(400)).await;
        let form = format!("{}{}", FORM, " ".repeat(500));
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::json(&form), Part::file("lote.csv", SHEET)],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 400);
        assert!(resp.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("upload exceeds the limit of 400 bytes"));
    }

    #[actix_web::test]
    async fn corrupt_workbook_is_unreadable() {
        let app = test::init_service(batch_app(4096)).await;
        let req = multipart_request(
            "/api/batch/generate",
            &[Part::json(FORM), Part::file("lote.xlsx", b"PK\x03\x04broken")],
        );

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 400);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("could not read the spreadsheet"));
    }
}
