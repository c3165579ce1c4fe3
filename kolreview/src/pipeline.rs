//! 审稿流水线驱动器
//! 在内核会话之上叠加外部协作方：可选的 AI 改写客户端。
//! 改写调用失败不破坏会话状态——会话停留在 BasicFixed，
//! 调用方可以重试 humanize，也可以显式 skip_ai 继续走完流水线

use std::sync::Arc;

use kolreview_engine::{
    CoreError, DiffSegment, ReviewSession, ReviewStage, RuleConfig, StageSnapshot,
};

use crate::error::{KolError, KolResult};
use crate::rewriter::RewriteClient;

/// 一次完整审稿的驱动器：内核会话 + 可选 AI 改写客户端
#[derive(Debug)]
pub struct ReviewPipeline {
    session: ReviewSession,
    rewriter: Option<RewriteClient>,
}

impl ReviewPipeline {
    /// 上传原始文案，进入 Draft 阶段
    /// 空输入在进内核之前拦截为调用方错误
    pub fn upload(
        config: Arc<RuleConfig>,
        raw: &str,
        rewriter: Option<RewriteClient>,
    ) -> KolResult<Self> {
        if raw.trim().is_empty() {
            return Err(KolError::InvalidInput("内容为空，无可审核文本".into()));
        }
        let session = ReviewSession::from_raw(config, raw).map_err(|e| match e {
            CoreError::EmptyContent => KolError::InvalidInput("内容为空，无可审核文本".into()),
            other => KolError::EngineError(other),
        })?;
        Ok(Self { session, rewriter })
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn stage(&self) -> ReviewStage {
        self.session.stage()
    }

    pub fn current(&self) -> &StageSnapshot {
        self.session.current()
    }

    pub fn has_rewriter(&self) -> bool {
        self.rewriter.is_some()
    }

    /// Draft → BasicFixed
    pub fn auto_fix(&mut self) -> KolResult<&StageSnapshot> {
        Ok(self.session.apply_auto_fix()?)
    }

    /// BasicFixed → HumanizedReviewed，经由外部 AI 改写。
    /// 改写失败时返回错误且会话状态不变；未配置客户端返回 RewriteUnavailable
    pub async fn humanize(&mut self) -> KolResult<&StageSnapshot> {
        if self.session.stage() != ReviewStage::BasicFixed {
            return Err(KolError::EngineError(CoreError::InvalidStageTransition(
                format!("cannot humanize at stage {}", self.session.stage()),
            )));
        }
        let client = self.rewriter.as_ref().ok_or(KolError::RewriteUnavailable)?;
        let body = self.session.current().content.body.clone();
        let new_body = client.rewrite_body(&body, self.session.config()).await?;
        tracing::info!("AI改写完成，正文 {} 字节 → {} 字节", body.len(), new_body.len());
        Ok(self.session.apply_rewrite(new_body)?)
    }

    /// BasicFixed → HumanizedReviewed，显式跳过 AI
    pub fn skip_ai(&mut self) -> KolResult<&StageSnapshot> {
        Ok(self.session.skip_rewrite()?)
    }

    /// HumanizedReviewed → Final
    pub fn finalize(&mut self) -> KolResult<&StageSnapshot> {
        Ok(self.session.finalize()?)
    }

    /// 原地编辑当前阶段内容并重新审核
    pub fn edit(
        &mut self,
        titles: Vec<String>,
        body: String,
        tags: String,
    ) -> KolResult<&StageSnapshot> {
        Ok(self.session.edit_current(titles, body, tags)?)
    }

    /// 对比两个已到达阶段的正文
    pub fn diff(&self, from: ReviewStage, to: ReviewStage) -> KolResult<Vec<DiffSegment>> {
        Ok(self.session.diff_bodies(from, to)?)
    }

    /// 汇总自动修复与改写清理两个环节的全部变更记录
    pub fn all_changes(&self) -> Vec<&kolreview_engine::ChangeRecord> {
        [ReviewStage::BasicFixed, ReviewStage::HumanizedReviewed]
            .iter()
            .filter_map(|stage| self.session.snapshot(*stage))
            .flat_map(|s| s.changes.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolreview_engine::load_rule_config;

    fn config() -> Arc<RuleConfig> {
        let json = serde_json::json!({
            "meta": {"brand": "能恩全护", "direction": "防敏种草", "platform": "小红书"},
            "hard_rules": {
                "word_count": {"min": 0, "max": 10000},
                "titles": {"required_count": 2, "keywords": []},
                "hashtags": {"required": [{"tag": "#能恩全护", "min_count": 1}]},
                "forbidden_words": [
                    {"word": "过敏", "category": "禁止词", "replacement": "敏敏"}
                ],
                "structure": {"paragraphs": []}
            }
        });
        Arc::new(load_rule_config(&json.to_string()).unwrap())
    }

    #[test]
    fn empty_upload_is_caller_error() {
        let err = ReviewPipeline::upload(config(), "   ", None).unwrap_err();
        assert!(matches!(err, KolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn humanize_without_client_is_recoverable() {
        let mut pipeline =
            ReviewPipeline::upload(config(), "正文\n宝宝过敏了之后的喂养记录", None).unwrap();
        pipeline.auto_fix().unwrap();

        let err = pipeline.humanize().await.unwrap_err();
        assert!(matches!(err, KolError::RewriteUnavailable));
        // 会话仍停留在 BasicFixed，跳过路径照常可走
        assert_eq!(pipeline.stage(), ReviewStage::BasicFixed);
        pipeline.skip_ai().unwrap();
        pipeline.finalize().unwrap();
        assert_eq!(pipeline.stage(), ReviewStage::Final);
    }

    #[test]
    fn all_changes_merges_fix_and_rewrite_cleanup() {
        let mut pipeline =
            ReviewPipeline::upload(config(), "正文\n宝宝过敏了之后的喂养记录", None).unwrap();
        pipeline.auto_fix().unwrap();
        let n_fix = pipeline.all_changes().len();
        assert!(n_fix >= 1);
        pipeline.skip_ai().unwrap();
        // skip 路径不新增变更
        assert_eq!(pipeline.all_changes().len(), n_fix);
    }
}
