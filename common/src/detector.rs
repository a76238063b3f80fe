//! アップロード・プレビュー・送信コントローラ
//!
//! UI状態を1か所で保持する。I/Oは持たず、非同期処理（プレビュー生成・解析リクエスト）は
//! 呼び出し側が行い、発行したチケットを添えて結果を戻す。
//!
//! 状態遷移: `Idle → Selecting → Ready → Submitting → Ready`
//!
//! - ファイルを選び直すたびにプレビューのチケットが進み、古い読み込み結果は破棄される
//! - 送信ごとにリクエストトークンが進み、最新でない応答は破棄される

use crate::types::{AnalysisResult, SelectedFile};
use crate::view::ResultView;
use std::fmt::Display;
use thiserror::Error;

/// 送信ボタンの表示
pub const SUBMIT_LABEL: &str = "Analyze Plant";
pub const SUBMIT_LABEL_LOADING: &str = "Processing...";

/// プレビューの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// ファイル未選択、または読み込み中
    #[default]
    Pending,
    Ready(String),
    /// 読み込み失敗（表示なし）
    Unavailable,
}

/// 画面の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selecting,
    Ready,
    Submitting,
}

/// 直近の送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// 非同期処理の結果を反映したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// より新しい操作があったため破棄
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket {
    selection: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    token: u64,
}

/// 送信できない理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("画像が選択されていません")]
    NoFileSelected,

    #[error("解析中です")]
    AlreadySubmitting,
}

/// コントローラ本体
#[derive(Debug, Clone, Default)]
pub struct DetectorState {
    selected: Option<SelectedFile>,
    preview: PreviewState,
    result: Option<AnalysisResult>,
    last_error: Option<String>,
    last_outcome: Option<Outcome>,
    loading: bool,
    selection_seq: u64,
    request_seq: u64,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを選択
    ///
    /// プレビューは読み込み待ちに戻る。解析中だった場合、その応答は破棄対象になる。
    pub fn select_file(&mut self, file: SelectedFile) -> PreviewTicket {
        self.selection_seq += 1;
        self.selected = Some(file);
        self.preview = PreviewState::Pending;

        if self.loading {
            self.request_seq += 1;
            self.loading = false;
        }

        PreviewTicket {
            selection: self.selection_seq,
        }
    }

    /// プレビュー（Data URL）の読み込み完了
    pub fn complete_preview(&mut self, ticket: PreviewTicket, data_url: String) -> Completion {
        if ticket.selection != self.selection_seq {
            return Completion::Stale;
        }
        self.preview = PreviewState::Ready(data_url);
        Completion::Applied
    }

    /// プレビューの読み込み失敗
    pub fn fail_preview(&mut self, ticket: PreviewTicket) -> Completion {
        if ticket.selection != self.selection_seq {
            return Completion::Stale;
        }
        self.preview = PreviewState::Unavailable;
        Completion::Applied
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.loading
    }

    /// 送信開始
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if self.selected.is_none() {
            return Err(SubmitRejected::NoFileSelected);
        }
        if self.loading {
            return Err(SubmitRejected::AlreadySubmitting);
        }

        self.request_seq += 1;
        self.loading = true;
        Ok(SubmitTicket {
            token: self.request_seq,
        })
    }

    /// 送信完了
    ///
    /// 失敗時は前回の結果を残したままエラーを記録する。
    pub fn complete_submit<E: Display>(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<AnalysisResult, E>,
    ) -> Completion {
        if ticket.token != self.request_seq {
            return Completion::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.last_error = None;
                self.last_outcome = Some(Outcome::Success);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.last_outcome = Some(Outcome::Failure);
            }
        }
        Completion::Applied
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            return Phase::Submitting;
        }
        match (&self.selected, &self.preview) {
            (None, _) => Phase::Idle,
            (Some(_), PreviewState::Pending) => Phase::Selecting,
            (Some(_), _) => Phase::Ready,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        match &self.preview {
            PreviewState::Ready(data_url) => Some(data_url),
            _ => None,
        }
    }

    pub fn preview_state(&self) -> &PreviewState {
        &self.preview
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.result.as_ref().map(ResultView::from_result)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }
}
