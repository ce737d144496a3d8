use std::fs;
use std::path::Path;

use ingde::config::Config;
use ingde::evaluate::evaluate_request;
use ingde::gde::DeteriorationLevel;
use ingde::ingest::{load_request, validate_request};
use ingde::output::{format_report, render_report, save_report};

const PIERS: &str = "\
Danos,Pilar P01,,Pilar P02,,Pilar P03,,Pilar P04,
,Fi,Fp,Fi,Fp,Fi,Fp,Fi,Fp
Desagregação,,,,,1,3,1,3
Falha de Concretagem,1,3,1,3,,,,
";

// One heavily damaged beam: Fi = 4, Fp = 3 -> d = (48 - 28) * 3 = 60
const BEAMS: &str = "\
Danos;Viga V1;;Viga V2;
;Fi;Fp;Fi;Fp
Danos;Fi;Fp;Fi;Fp
Corrosão de armaduras;4;3;;
Fissuras;2,5;4;abc;1
";

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_manifest_to_report() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(&root.join("pilares/planilha_inspecao.csv"), PIERS);
    write(&root.join("pilares/fotos/image_1.png"), "png");
    write(&root.join("vigas.csv"), BEAMS);
    write(
        &root.join("relatorio.yaml"),
        "title: Ponte do Córrego Fundo\nfamilies:\n  - name: Pilares\n    path: pilares\n    importance: 5\n  - name: Vigas\n    path: vigas.csv\n    importance: 5\n",
    );

    let request = load_request(&root.join("relatorio.yaml")).unwrap();
    assert!(validate_request(&request).is_ok());

    let config: Config = serde_saphyr::from_str("sheet:\n  delimiter: \";\"\n").unwrap();
    let report = evaluate_request(&request, &config, false).await.unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Pilares");
    assert_eq!(report.families.len(), 1);
    assert_eq!(report.structure.g_d, 60.0);

    // A per-family delimiter lets comma and semicolon sheets share one run
    let mut request = request;
    request.families[0].delimiter = Some(",".to_string());
    assert!(validate_request(&request).is_ok());
    let report = evaluate_request(&request, &config, false).await.unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.families.len(), 2);

    let beams = &report.families[1];
    assert_eq!(beams.observations, 2);
    assert_eq!(beams.coerced_cells, 1);
    let v1 = beams.result.elements["Viga V1"];
    assert_eq!(v1.sum_d, 60.0);
    assert_eq!(v1.g_de, 60.0);
    // Fi = 2.5 falls in the uncovered interval, "abc" reads as 0
    let v2 = beams.result.elements["Viga V2"];
    assert_eq!(v2.g_de, 0.0);
    assert_eq!(beams.result.participating(), 1);
    assert_eq!(beams.result.g_df, 60.0);

    // (5 * 3.1749 + 5 * 60) / 10
    assert!((report.structure.g_d - 31.5874).abs() < 0.001);
    assert_eq!(report.structure.level, DeteriorationLevel::Medium);
}

#[tokio::test]
async fn test_directory_family_with_photos_renders_html() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(&root.join("pilares/planilha_inspecao.csv"), PIERS);
    write(&root.join("pilares/fotos/image_2.jpg"), "jpg");
    write(&root.join("pilares/fotos/image_1.png"), "png");
    write(
        &root.join("relatorio.yaml"),
        "families:\n  - name: Pilares\n    path: pilares\n    importance: 5\n",
    );

    let request = load_request(&root.join("relatorio.yaml")).unwrap();
    let report = evaluate_request(&request, &Config::default(), false).await.unwrap();

    let family = &report.families[0];
    assert_eq!(family.photos.len(), 2);
    assert!(family.photos[0].ends_with("fotos/image_1.png"));
    assert!((family.result.g_df - 3.1749).abs() < 0.001);
    assert!((report.structure.g_d - 3.1749).abs() < 0.001);
    assert_eq!(report.structure.level, DeteriorationLevel::Low);

    let text = format_report(&report, false);
    assert!(text.contains("Família 1 – Pilares"));
    assert!(text.contains("Baixo"));

    let out = root.join("relatorio_gde.html");
    save_report(&out, &render_report(&report).unwrap()).unwrap();
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("Relatório Consolidado GDE"));
    assert!(html.contains("<img src='data:image/png;base64,cG5n' alt='image_1.png'>"));
    assert!(html.contains("<img src='data:image/jpeg;base64,anBn' alt='image_2.jpg'>"));
    assert!(!html.contains("fotos/"));
    assert!(html.contains("Estado aceitável. Manutenção preventiva."));
}

#[tokio::test]
async fn test_tsv_family_next_to_csv_family() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("pilares.csv"), PIERS);
    write(&root.join("lajes.tsv"), &PIERS.replace(',', "\t"));
    write(
        &root.join("relatorio.yaml"),
        "families:\n  - path: pilares.csv\n    importance: 5\n  - path: lajes.tsv\n    importance: 4\n",
    );

    let request = load_request(&root.join("relatorio.yaml")).unwrap();
    let report = evaluate_request(&request, &Config::default(), false).await.unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.families[1].name, "lajes");
    assert!((report.families[1].result.g_df - 3.1749).abs() < 0.001);
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("pilares.csv"), PIERS);
    write(
        &root.join("relatorio.yaml"),
        "families:\n  - path: pilares.csv\n    importance: 5\n",
    );

    let request = load_request(&root.join("relatorio.yaml")).unwrap();
    let report = evaluate_request(&request, &Config::default(), false).await.unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["structure"]["level"], "Baixo");
    assert_eq!(json["families"][0]["name"], "pilares");
    assert_eq!(json["families"][0]["result"]["f_r"], 5.0);
    let p01 = &json["families"][0]["result"]["elements"]["Pilar P01"];
    assert!((p01["g_de"].as_f64().unwrap() - 2.4).abs() < 1e-9);
    assert!(json["families"][0].get("original").is_none());
}
