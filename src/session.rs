//! 1枚の画像を選択・プレビュー・送信するセッション
//!
//! 状態は `DetectorState` が持ち、ここではI/Oを担当する。

use crate::client::ImageProcessor;
use crate::error::{DetectorError, Result};
use crate::upload::{ImageUpload, Preview};
use plant_disease_common::{Completion, DetectorState, ResultView, SubmitRejected};
use tracing::{error, info, warn};

pub struct Session<P> {
    processor: P,
    state: DetectorState,
    upload: Option<ImageUpload>,
    preview: Option<Preview>,
}

impl<P: ImageProcessor> Session<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            state: DetectorState::new(),
            upload: None,
            preview: None,
        }
    }

    /// 画像を選択してプレビューを生成
    ///
    /// デコードできない画像でも選択は有効（プレビューなし）
    pub fn select(&mut self, upload: ImageUpload) -> Option<&Preview> {
        let ticket = self.state.select_file(upload.meta());
        self.preview = None;

        match upload.preview() {
            Ok(preview) => {
                if self.state.complete_preview(ticket, preview.data_url.clone()) == Completion::Applied {
                    self.preview = Some(preview);
                }
            }
            Err(e) => {
                warn!(file = %upload.file_name, error = %e, "プレビューを生成できません");
                self.state.fail_preview(ticket);
            }
        }

        self.upload = Some(upload);
        self.preview.as_ref()
    }

    /// 選択中の画像を送信
    ///
    /// 通信・応答のエラーは状態に記録して `Ok` を返す（前回の結果は残る）。
    /// 送信できない状態の場合のみ `Err`。
    pub async fn submit(&mut self) -> Result<Completion> {
        let ticket = self.state.begin_submit()?;
        let upload = self
            .upload
            .as_ref()
            .ok_or(DetectorError::SubmitRejected(SubmitRejected::NoFileSelected))?;

        let outcome = self.processor.process_image(upload).await;
        match &outcome {
            Ok(result) => info!(
                file = %upload.file_name,
                predicted_class = %result.predicted_class,
                "解析完了"
            ),
            Err(e) => error!(file = %upload.file_name, error = %e, "画像の解析に失敗"),
        }

        Ok(self.state.complete_submit(ticket, outcome))
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn upload(&self) -> Option<&ImageUpload> {
        self.upload.as_ref()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.state.result_view()
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}
