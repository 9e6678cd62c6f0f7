//! # Trigger 模块
//!
//! 离散 UI 事件到动画动作的映射表。

use serde::{Deserialize, Serialize};

use crate::animation::InteractionState;

/// UI 事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Click,
    HoverEnter,
    HoverLeave,
    /// 元素挂载（首次测量到非零尺寸）
    Mount,
    Press,
    Release,
}

impl TriggerKind {
    /// 全部事件
    pub const ALL: [TriggerKind; 6] = [
        TriggerKind::Click,
        TriggerKind::HoverEnter,
        TriggerKind::HoverLeave,
        TriggerKind::Mount,
        TriggerKind::Press,
        TriggerKind::Release,
    ];

    /// 从命令行名称解析（`click`、`hover-enter` 等）
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
    }

    /// snake_case 名称
    pub fn name(self) -> &'static str {
        match self {
            TriggerKind::Click => "click",
            TriggerKind::HoverEnter => "hover_enter",
            TriggerKind::HoverLeave => "hover_leave",
            TriggerKind::Mount => "mount",
            TriggerKind::Press => "press",
            TriggerKind::Release => "release",
        }
    }
}

/// 事件触发的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "state")]
pub enum TriggerAction {
    /// 重新触发脉冲
    Pulse,
    /// 重新开始淡入淡出
    Fade,
    /// 粒子爆炸（受重入保护）
    Explode,
    /// 切换波纹交互状态
    Interaction(InteractionState),
}

/// 单条绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerBinding {
    pub on: TriggerKind,
    pub actions: Vec<TriggerAction>,
}

/// 事件绑定表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerBindings(Vec<TriggerBinding>);

impl TriggerBindings {
    pub fn new(bindings: Vec<TriggerBinding>) -> Self {
        Self(bindings)
    }

    /// 事件对应的全部动作，按绑定顺序
    pub fn actions_for(&self, kind: TriggerKind) -> impl Iterator<Item = TriggerAction> + '_ {
        self.0
            .iter()
            .filter(move |b| b.on == kind)
            .flat_map(|b| b.actions.iter().copied())
    }

    pub fn bindings(&self) -> &[TriggerBinding] {
        &self.0
    }
}

impl Default for TriggerBindings {
    fn default() -> Self {
        use TriggerAction::*;
        let bind = |on, actions: &[TriggerAction]| TriggerBinding {
            on,
            actions: actions.to_vec(),
        };
        Self(vec![
            bind(TriggerKind::Click, &[Pulse, Explode, Fade]),
            bind(
                TriggerKind::HoverEnter,
                &[Interaction(InteractionState::Hovered)],
            ),
            bind(
                TriggerKind::HoverLeave,
                &[Interaction(InteractionState::Normal)],
            ),
            bind(
                TriggerKind::Press,
                &[Interaction(InteractionState::Pressed)],
            ),
            bind(
                TriggerKind::Release,
                &[Interaction(InteractionState::Hovered)],
            ),
            bind(TriggerKind::Mount, &[Fade]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_click_actions() {
        let bindings = TriggerBindings::default();
        let actions: Vec<_> = bindings.actions_for(TriggerKind::Click).collect();
        insta::assert_debug_snapshot!(actions, @r"
        [
            Pulse,
            Explode,
            Fade,
        ]
        ");
    }

    #[test]
    fn test_press_release_cycle() {
        let bindings = TriggerBindings::default();
        assert_eq!(
            bindings.actions_for(TriggerKind::Press).collect::<Vec<_>>(),
            vec![TriggerAction::Interaction(InteractionState::Pressed)]
        );
        assert_eq!(
            bindings.actions_for(TriggerKind::Release).collect::<Vec<_>>(),
            vec![TriggerAction::Interaction(InteractionState::Hovered)]
        );
    }

    #[test]
    fn test_unbound_kind_yields_nothing() {
        let bindings = TriggerBindings::new(vec![]);
        assert_eq!(bindings.actions_for(TriggerKind::Click).count(), 0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(TriggerKind::from_name("click"), Some(TriggerKind::Click));
        assert_eq!(
            TriggerKind::from_name("Hover-Enter"),
            Some(TriggerKind::HoverEnter)
        );
        assert_eq!(TriggerKind::from_name("double_click"), None);
    }

    #[test]
    fn test_bindings_serde() {
        let json = serde_json::to_string(&TriggerBindings::default()).unwrap();
        assert!(json.contains(r#"{"action":"interaction","state":"pressed"}"#));
        let back: TriggerBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TriggerBindings::default());
    }
}
