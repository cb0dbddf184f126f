//! 页面渲染器 - 基础设施层
//!
//! 把工作簿渲染为按页排列的图片。统计核心不依赖本模块，
//! 编排层在对齐之前等待渲染完成。

use crate::config::Config;
use crate::error::RenderError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// 每个工作表导出为单独一页的 PDF 过滤参数
const SINGLE_PAGE_FILTER: &str =
    r#"pdf:calc_pdf_Export:{"SinglePageSheets":{"type":"boolean","value":"true"}}"#;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// 页面渲染器
///
/// 返回的图片路径按页码排列，第 i 个元素是第 i 页。
pub trait PageRenderer {
    fn render(
        &self,
        workbook: &Path,
    ) -> impl Future<Output = Result<Vec<PathBuf>, RenderError>> + Send;
}

/// 从文件名末尾取页码：`巡检-07.jpg` → 7
pub fn page_number(path: &Path) -> Option<usize> {
    let stem = path.file_stem()?.to_str()?;
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

fn is_page_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 按页码排序；没有页码的图片排在最后，按文件名排序
pub fn sort_pages(pages: &mut [PathBuf]) {
    pages.sort_by(|a, b| {
        let key_a = (page_number(a).unwrap_or(usize::MAX), a.file_name());
        let key_b = (page_number(b).unwrap_or(usize::MAX), b.file_name());
        key_a.cmp(&key_b)
    });
}

/// 列出目录中的页面图片，按页码排列
async fn list_page_images(dir: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>, RenderError> {
    let dir_error = |e| RenderError::DirectoryReadFailed {
        path: dir.display().to_string(),
        source: e,
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(dir_error)?;
    let mut pages = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(dir_error)? {
        let path = entry.path();
        if !is_page_image(&path) {
            continue;
        }
        let matches_prefix = match prefix {
            Some(p) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(p))
                .unwrap_or(false),
            None => true,
        };
        if matches_prefix {
            pages.push(path);
        }
    }

    sort_pages(&mut pages);
    Ok(pages)
}

async fn ensure_dir(dir: &Path) -> Result<(), RenderError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| RenderError::DirectoryCreateFailed {
            path: dir.display().to_string(),
            source: e,
        })
}

/// 运行外部命令，非零退出码转为错误
async fn run_command(program: &str, args: &[String]) -> Result<(), RenderError> {
    debug!("执行命令: {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| RenderError::SpawnFailed {
            program: program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(RenderError::CommandFailed {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// soffice 导出 PDF，pdftoppm 再按页转为 JPEG
#[derive(Debug, Clone)]
pub struct SofficeRenderer {
    soffice_bin: String,
    pdftoppm_bin: String,
    pdfs_dir: PathBuf,
    images_dir: PathBuf,
    dpi: u32,
    single_page: bool,
}

impl SofficeRenderer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            soffice_bin: config.render.soffice_bin.clone(),
            pdftoppm_bin: config.render.pdftoppm_bin.clone(),
            pdfs_dir: config.path.pdfs_dir.clone(),
            images_dir: config.path.images_dir.clone(),
            dpi: config.page.dpi,
            single_page: config.page.single_page,
        }
    }

    /// soffice 的命令行参数
    pub fn soffice_args(&self, workbook: &Path) -> Vec<String> {
        let target = if self.single_page {
            SINGLE_PAGE_FILTER
        } else {
            "pdf"
        };
        vec![
            "--headless".to_string(),
            "--convert-to".to_string(),
            target.to_string(),
            "--outdir".to_string(),
            self.pdfs_dir.display().to_string(),
            workbook.display().to_string(),
        ]
    }

    /// pdftoppm 的命令行参数，输出文件名为 `{前缀}-{页码}.jpg`
    pub fn pdftoppm_args(&self, pdf: &Path, prefix: &str) -> Vec<String> {
        vec![
            "-jpeg".to_string(),
            "-r".to_string(),
            self.dpi.to_string(),
            pdf.display().to_string(),
            self.images_dir.join(prefix).display().to_string(),
        ]
    }

    async fn convert_to_pdf(&self, workbook: &Path) -> Result<PathBuf, RenderError> {
        ensure_dir(&self.pdfs_dir).await?;
        info!("📄 正在导出 PDF: {}", workbook.display());
        run_command(&self.soffice_bin, &self.soffice_args(workbook)).await?;

        let stem = workbook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pdf = self.pdfs_dir.join(format!("{}.pdf", stem));
        if !tokio::fs::try_exists(&pdf).await.unwrap_or(false) {
            return Err(RenderError::OutputMissing {
                path: pdf.display().to_string(),
            });
        }
        info!("✓ 已导出 PDF: {}", pdf.display());
        Ok(pdf)
    }

    async fn convert_to_images(&self, pdf: &Path) -> Result<Vec<PathBuf>, RenderError> {
        ensure_dir(&self.images_dir).await?;
        let prefix = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());

        info!("🖼️  正在转换图片 (dpi={})", self.dpi);
        run_command(&self.pdftoppm_bin, &self.pdftoppm_args(pdf, &prefix)).await?;

        let page_prefix = format!("{}-", prefix);
        let pages = list_page_images(&self.images_dir, Some(page_prefix.as_str())).await?;
        info!("✓ 共生成 {} 张页面图片", pages.len());
        Ok(pages)
    }
}

impl PageRenderer for SofficeRenderer {
    async fn render(&self, workbook: &Path) -> Result<Vec<PathBuf>, RenderError> {
        let pdf = self.convert_to_pdf(workbook).await?;
        self.convert_to_images(&pdf).await
    }
}

/// 读取已经渲染好的页面图片
#[derive(Debug, Clone)]
pub struct DirectoryPages {
    dir: PathBuf,
}

impl DirectoryPages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageRenderer for DirectoryPages {
    async fn render(&self, _workbook: &Path) -> Result<Vec<PathBuf>, RenderError> {
        info!("📁 读取页面图片目录: {}", self.dir.display());
        list_page_images(&self.dir, None).await
    }
}
