use std::path::Path;

use serde::Serialize;

use crate::intelligence::{rank_wallets, RankBy};
use crate::models::{ActivityMode, ScanMeta, ScanSnapshot, WalletView};

#[derive(Serialize)]
struct ExportFile<'a> {
    #[serde(flatten)]
    meta: &'a ScanMeta,
    mode: ActivityMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank_by: Option<RankBy>,
    wallets: &'a [WalletView],
}

#[derive(Serialize)]
struct MetaFile<'a> {
    #[serde(flatten)]
    meta: &'a ScanMeta,
    files: &'a [String],
}

/// Write a scan to `dir` as static JSON files:
///
/// - `<mode>_all.json` for each activity mode
/// - `<mode>_<criterion>.json` for each scored criterion
/// - `meta.json` listing the files written
///
/// Every file is written to a temporary path and renamed into place so
/// readers never observe a partial file. Returns the data file names.
pub async fn write_snapshot(dir: &Path, snapshot: &ScanSnapshot) -> anyhow::Result<Vec<String>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::new();

    for mode in ActivityMode::ALL {
        let wallets = snapshot.wallets(mode);

        let name = format!("{mode}_all.json");
        let file = ExportFile {
            meta: &snapshot.meta,
            mode,
            rank_by: None,
            wallets,
        };
        write_json_atomic(&dir.join(&name), &file).await?;
        written.push(name);

        for by in RankBy::SCORED {
            let ranked = rank_wallets(wallets.to_vec(), by);
            let name = format!("{mode}_{by}.json");
            let file = ExportFile {
                meta: &snapshot.meta,
                mode,
                rank_by: Some(by),
                wallets: &ranked,
            };
            write_json_atomic(&dir.join(&name), &file).await?;
            written.push(name);
        }
    }

    let meta = MetaFile {
        meta: &snapshot.meta,
        files: &written,
    };
    write_json_atomic(&dir.join("meta.json"), &meta).await?;

    Ok(written)
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
