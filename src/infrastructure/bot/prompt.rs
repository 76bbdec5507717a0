//! Context renderer - Deterministic turn prompt for the decision oracle
//!
//! Prompt wording is presentation, not contract: nothing downstream
//! parses it back. Output is bounded (history capped per game phase
//! rules below) and fully determined by its inputs.

use crate::domain::services::inventory;
use crate::domain::value_objects::{format_card_list, format_grouped, Card, GameState, Infoset, Seat};
use serde_json::json;

/// Fixed system prompt sent with every request
pub const SYSTEM_PROMPT: &str =
    "你是一位专业的斗地主玩家，只返回JSON格式的决策结果。保持理由简洁明了。";

/// Most recent rounds shown in the detailed history section
const MAX_HISTORY_ROUNDS: usize = 8;

/// Render the full turn prompt for one decision point.
///
/// `unknown` is the deck-inventory output for this seat; per-seat
/// counts fall back to the even-split estimate when the engine does not
/// supply them.
pub fn render_turn_prompt(
    seat: Seat,
    state: &GameState,
    infoset: &Infoset,
    unknown: &[Card],
) -> String {
    let estimated = infoset.seat_card_counts.is_none();
    let counts = infoset
        .seat_card_counts
        .unwrap_or_else(|| inventory::estimate_seat_counts(seat, state.hand.len(), unknown.len()));

    let mut lines = vec![
        format!("你是斗地主游戏中的{}。", seat.display_name()),
        String::new(),
        format!("你的手牌：{}", format_grouped(&state.hand)),
        last_move_line(state),
        String::new(),
    ];

    lines.push(if estimated {
        "各家剩余手牌数（估算）：".to_string()
    } else {
        "各家剩余手牌数：".to_string()
    });
    for s in Seat::ROTATION {
        lines.push(format!("- {}：{}张", s.display_name(), counts.get(s)));
    }
    lines.push(String::new());

    lines.push(format!(
        "剩余未知牌（{}张）：{}",
        unknown.len(),
        format_grouped(unknown)
    ));
    lines.push(format!(
        "【牌局阶段：{}】",
        phase_label(state.cards_played_count())
    ));
    lines.push(String::new());

    lines.push("【出牌统计】".to_string());
    for s in Seat::ROTATION {
        let (plays, passes) = state.seat_record(s);
        lines.push(format!(
            "- {}：出牌{}次，过牌{}次",
            s.display_name(),
            plays,
            passes
        ));
    }
    lines.push(String::new());

    lines.push("【详细对局】".to_string());
    if state.played_with_seat.is_empty() {
        lines.push("（尚无出牌记录）".to_string());
    } else {
        let rounds: Vec<&[(Seat, crate::domain::value_objects::Play)]> =
            state.played_with_seat.chunks(3).collect();
        let skipped = rounds.len().saturating_sub(MAX_HISTORY_ROUNDS);
        for (i, round) in rounds.iter().enumerate().skip(skipped) {
            let moves: Vec<String> = round
                .iter()
                .map(|(s, play)| format!("{}出{}", s.display_name(), play))
                .collect();
            lines.push(format!("第{}轮：{}", i + 1, moves.join("，")));
        }
    }
    lines.push(String::new());

    lines.push("可选动作（JSON格式）：".to_string());
    lines.push(render_options_json(infoset));
    lines.push(String::new());

    lines.push("斗地主规则：".to_string());
    lines.push("1. 出牌必须能压过上家的牌".to_string());
    lines.push("2. 炸弹（四张相同的牌）可以压任何非王炸牌型".to_string());
    lines.push("3. 王炸（小王+大王）是最大的牌".to_string());
    lines.push("4. 最先出完手牌者获胜".to_string());
    lines.push(String::new());

    lines.push("策略建议：".to_string());
    lines.extend(strategy_tips(state));
    lines.push(String::new());

    lines.push(format!(
        "当前分析：手牌{}张，{}，{}。",
        state.hand.len(),
        if hand_has_bomb(&state.hand) {
            "有炸弹"
        } else {
            "无炸弹"
        },
        if hand_has_rocket(&state.hand) {
            "有王炸"
        } else {
            "无王炸"
        }
    ));
    lines.push(String::new());

    lines.push(
        r#"重要：只返回JSON格式的决策，例如 {"cards": "3 3 3", "reason": "简短理由", "confidence": 0.8}。"#
            .to_string(),
    );
    lines.push(r#"过牌时返回 {"cards": "过牌"}。"#.to_string());

    lines.join("\n")
}

fn last_move_line(state: &GameState) -> String {
    match (&state.last_move, state.last_seat) {
        (Some(play), Some(seat)) if !play.is_pass() => {
            format!("上家出牌：{}（{}）", play, seat.display_name())
        }
        (Some(play), None) if !play.is_pass() => format!("上家出牌：{}", play),
        _ => "上家出牌：无".to_string(),
    }
}

/// Legal moves as the oracle sees them: `[{"index": i, "cards": "..."}]`
fn render_options_json(infoset: &Infoset) -> String {
    let options: Vec<serde_json::Value> = infoset
        .legal_moves
        .iter()
        .enumerate()
        .map(|(index, play)| json!({"index": index, "cards": format_card_list(play.cards())}))
        .collect();
    serde_json::Value::Array(options).to_string()
}

fn phase_label(cards_played: usize) -> &'static str {
    if cards_played < 18 {
        "前期"
    } else if cards_played < 36 {
        "中期"
    } else {
        "后期"
    }
}

fn strategy_tips(state: &GameState) -> Vec<String> {
    let mut tips = Vec::new();
    let leading = match &state.last_move {
        None => true,
        Some(play) => play.is_pass(),
    };
    if leading {
        tips.push("- 你是本轮首家出牌，可以自由选择牌型。".to_string());
    } else {
        tips.push("- 需要出比上家更大的牌，或选择过牌。".to_string());
    }
    if hand_has_bomb(&state.hand) {
        tips.push("- 你手中有炸弹，可以在关键时刻使用。".to_string());
    }
    if hand_has_rocket(&state.hand) {
        tips.push("- 你手中有王炸，这是最大的牌型。".to_string());
    }
    tips
}

fn hand_has_bomb(hand: &[Card]) -> bool {
    Card::ALL
        .iter()
        .any(|&card| hand.iter().filter(|&&h| h == card).count() >= 4)
}

fn hand_has_rocket(hand: &[Card]) -> bool {
    hand.contains(&Card::BlackJoker) && hand.contains(&Card::RedJoker)
}
