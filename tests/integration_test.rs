use inspection_report::models::loaders::toml_loader::parse_toml_workbook;
use inspection_report::models::{load_toml_workbook, load_xlsx_workbook, SheetStatistics};
use inspection_report::orchestrator::{process_catalog, SheetOutcome};
use inspection_report::services::PageAligner;
use inspection_report::{SchemaConvention, SheetFlow};
use std::path::{Path, PathBuf};

const SAMPLE_WORKBOOK: &str = "demos/巡检样例.toml";

fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SAMPLE_WORKBOOK)
}

fn pages(n: usize) -> Vec<PathBuf> {
    (1..=n)
        .map(|i| PathBuf::from(format!("tmp/images/巡检样例-{}.jpg", i)))
        .collect()
}

#[tokio::test]
async fn test_sample_workbook_summary() {
    let catalog = load_toml_workbook(&sample_path())
        .await
        .expect("加载样例工作簿失败");
    assert_eq!(catalog.len(), 7);

    let flow = SheetFlow::new().unwrap();
    let summary = process_catalog(&flow, &catalog, &SchemaConvention::default());

    let stats = summary.stats();
    assert_eq!(stats.processed, 6);
    assert_eq!(stats.skipped, 1);
    assert!(matches!(
        summary.outcome("备注"),
        Some(SheetOutcome::Skipped { position: 4, .. })
    ));

    let text = &summary.text;
    assert!(text.starts_with("====== 服务器巡检 巡检统计结果 ======"));
    assert!(text.contains("正常率：60.0%"));
    assert!(text.contains("异常率：40.0%"));
    assert!(text.contains("异常描述汇总：1. 磁盘空间（空间不足告警）；2. 网络连通性（连接失败）"));
    assert!(text.contains("正常率：66.67%"));
    assert!(text.contains("正常率：100.0%"));
    assert!(!text.contains("====== 备注"));

    // 块按工作簿顺序排列
    let order: Vec<usize> = ["服务器巡检", "存储巡检", "虚拟化巡检", "机房环境", "设备清单", "网络设备"]
        .iter()
        .map(|name| text.find(&format!("====== {} ", name)).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_unclassified_rows_are_counted_separately() {
    let catalog = parse_toml_workbook(
        r#"
[[sheets]]
name = "存储巡检"
headers = ["检查项", "检查内容", "检查结果"]
rows = [
    ["阵列状态", "RAID 组状态", "运行正常"],
    ["硬盘状态", "无坏盘", "设备无告警"],
    ["控制器", "双控在线", "状态不正常"],
]
"#,
        "inline",
    )
    .unwrap();

    let flow = SheetFlow::new().unwrap();
    let summary = process_catalog(&flow, &catalog, &SchemaConvention::default());

    match summary.outcome("存储巡检").and_then(SheetOutcome::statistics) {
        Some(SheetStatistics::Inspection(m)) => {
            assert_eq!(m.total, 3);
            assert_eq!(m.normal_count, 1);
            assert_eq!(m.abnormal_count, 1);
            assert_eq!(m.unclassified_count, 1);
            assert_eq!(m.abnormal_records[0].item, "控制器");
        }
        other => panic!("意外的统计结果: {:?}", other),
    }
}

#[test]
fn test_missing_column_does_not_block_later_sheets() {
    let catalog = parse_toml_workbook(
        r#"
[[sheets]]
name = "表1"
headers = ["技术指标", "检查结果"]
rows = [["CPU", "正常"]]

[[sheets]]
name = "表2"
headers = ["备注", "其他"]
rows = [["x", "y"]]

[[sheets]]
name = "表3"
headers = ["技术指标", "检查结果"]
rows = [["内存", "异常"]]
"#,
        "inline",
    )
    .unwrap();

    let flow = SheetFlow::new().unwrap();
    let summary = process_catalog(&flow, &catalog, &SchemaConvention::default());

    assert!(matches!(
        summary.outcome("表2"),
        Some(SheetOutcome::Skipped { reason, .. }) if reason.contains("无法识别必要列")
    ));
    assert!(summary.text.contains("====== 表1 巡检统计结果 ======"));
    assert!(summary.text.contains("====== 表3 巡检统计结果 ======"));
    assert!(summary
        .text
        .contains("=============================\n\n====== 表3 巡检统计结果 ======"));
}

#[tokio::test]
async fn test_inventory_rollups_from_sample() {
    let catalog = load_toml_workbook(&sample_path()).await.unwrap();
    let flow = SheetFlow::new().unwrap();
    let summary = process_catalog(&flow, &catalog, &SchemaConvention::default());

    match summary.outcome("设备清单").and_then(SheetOutcome::statistics) {
        Some(SheetStatistics::Inventory(tables)) => {
            let centers: Vec<_> = tables
                .centers
                .iter()
                .map(|c| (c.center.as_str(), c.device_count))
                .collect();
            assert_eq!(centers, vec![("centerA", 3), ("centerB", 2)]);
            assert_eq!(tables.types[0].device_type, "服务器");
            assert_eq!(tables.types[0].device_count, 3);
        }
        other => panic!("意外的统计结果: {:?}", other),
    }

    // 数据中心为空的行不计入数据中心统计
    match summary.outcome("网络设备").and_then(SheetOutcome::statistics) {
        Some(SheetStatistics::Inventory(tables)) => {
            assert_eq!(tables.centers.len(), 2);
            assert_eq!(tables.types.len(), 3);
        }
        other => panic!("意外的统计结果: {:?}", other),
    }
}

#[tokio::test]
async fn test_alignment_against_sample_catalog() {
    let catalog = load_toml_workbook(&sample_path()).await.unwrap();
    let names = catalog.names();
    let aligner = PageAligner::new();

    let short = aligner.align(pages(5), &names);
    assert_eq!(short.len(), 5);
    assert_eq!(short.unmapped(), &names[5..]);
    assert!(!short.contains("网络设备"));

    let long = aligner.align(pages(9), &names);
    assert_eq!(long.len(), 9);
    assert!(long.unmapped().is_empty());
    assert_eq!(long.names()[6], "网络设备");
    assert_eq!(&long.names()[7..], &["Page8", "Page9"]);
    assert_eq!(
        long.get("Page9"),
        Some(&PathBuf::from("tmp/images/巡检样例-9.jpg"))
    );
}

#[test]
fn test_mapping_serializes_to_json() {
    let names = vec!["表1".to_string(), "表2".to_string()];
    let mapping = PageAligner::new().align(pages(3), &names);
    let json = serde_json::to_value(&mapping).unwrap();

    assert_eq!(json["entries"][0]["name"], "表1");
    assert_eq!(json["entries"][2]["name"], "Page3");
    assert_eq!(json["entries"][2]["synthetic"], true);
    assert_eq!(json["warnings"][0]["kind"], "overflow");
}

#[test]
#[ignore] // 需要真实的 xlsx 文件：INSPECTION_XLSX=路径 cargo test -- --ignored
fn test_load_real_xlsx_workbook() {
    let path = std::env::var("INSPECTION_XLSX").expect("请设置 INSPECTION_XLSX");
    let catalog = load_xlsx_workbook(Path::new(&path)).expect("读取工作簿失败");
    assert!(!catalog.is_empty());

    let flow = SheetFlow::new().unwrap();
    let summary = process_catalog(&flow, &catalog, &SchemaConvention::default());
    println!("{}", summary.text);
}
