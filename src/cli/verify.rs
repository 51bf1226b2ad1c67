use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde_json::json;

use crate::cli::SubCommandExtend;
use crate::compare::{self, MATCH_THRESHOLD};
use crate::config::Opts;

#[derive(Parser, Debug, Clone)]
pub struct VerifyCommand {
    /// 参考照片路径
    pub reference: String,
    /// 待校验照片路径
    pub captured: String,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Table,
}

impl SubCommandExtend for VerifyCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        let reference = tokio::fs::read(&self.reference).await?;
        let captured = tokio::fs::read(&self.captured).await?;

        let reference = compare::normalize(&compare::decode_bytes(&reference)?);
        let captured = compare::normalize(&compare::decode_bytes(&captured)?);

        let score = compare::similarity(&reference, &captured);
        let pass = score >= MATCH_THRESHOLD;

        match self.output_format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "similarity": score,
                        "pass": pass,
                    }))?
                );
            }
            OutputFormat::Table => {
                println!("{:.2}\t{}", score, if pass { "pass" } else { "fail" });
            }
        }

        Ok(())
    }
}
