use serde::{Deserialize, Serialize};

use crate::trading::trade_record::TradeRecord;

pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderStats {
    pub account_id: String,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_profit: f64,
    /// Gross loss as a positive amount.
    pub total_loss: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    /// Length of the winning or losing run the history ends on.
    pub consecutive_wins: usize,
    pub consecutive_losses: usize,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    pub average_trade_duration: f64,
    pub total_lots_traded: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub recovery_factor: f64,
    pub initial_balance: f64,
    pub current_balance: f64,
    pub peak_balance: f64,
}

impl TraderStats {
    /// Aggregates closed trades in the order given.
    pub fn from_trades(account_id: &str, trades: &[TradeRecord], initial_balance: f64) -> Self {
        let total_trades = trades.len();
        let wins: Vec<f64> = trades.iter().filter(|t| t.is_win()).map(|t| t.profit).collect();
        let losses: Vec<f64> = trades.iter().filter(|t| !t.is_win()).map(|t| t.profit).collect();

        let total_profit: f64 = wins.iter().sum();
        let total_loss: f64 = losses.iter().sum::<f64>().abs();

        let profit_factor = if total_loss > 0.0 {
            total_profit / total_loss
        } else if !wins.is_empty() {
            f64::INFINITY
        } else {
            0.0
        };

        let mut current_win_run = 0;
        let mut current_loss_run = 0;
        let mut max_win_streak = 0;
        let mut max_loss_streak = 0;

        let mut balance = initial_balance;
        let mut peak = initial_balance;
        let mut max_drawdown: f64 = 0.0;
        let mut max_drawdown_pct: f64 = 0.0;

        for t in trades {
            if t.is_win() {
                current_win_run += 1;
                current_loss_run = 0;
            } else {
                current_loss_run += 1;
                current_win_run = 0;
            }
            max_win_streak = max_win_streak.max(current_win_run);
            max_loss_streak = max_loss_streak.max(current_loss_run);

            balance += t.profit;
            peak = peak.max(balance);
            let dd = peak - balance;
            if dd > max_drawdown {
                max_drawdown = dd;
                max_drawdown_pct = if peak > 0.0 { dd / peak * 100.0 } else { 0.0 };
            }
        }

        let net_profit = balance - initial_balance;

        TraderStats {
            account_id: account_id.to_string(),
            total_trades,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            total_profit,
            total_loss,
            win_rate: ratio(wins.len() as f64, total_trades as f64),
            profit_factor,
            average_win: ratio(total_profit, wins.len() as f64),
            average_loss: ratio(losses.iter().sum::<f64>(), losses.len() as f64),
            largest_win: wins.iter().copied().fold(0.0, f64::max),
            largest_loss: losses.iter().copied().fold(0.0, f64::min),
            consecutive_wins: current_win_run,
            consecutive_losses: current_loss_run,
            max_win_streak,
            max_loss_streak,
            average_trade_duration: ratio(
                trades.iter().map(|t| t.duration_hours).sum(),
                total_trades as f64,
            ),
            total_lots_traded: trades.iter().map(|t| t.lots).sum(),
            max_drawdown,
            max_drawdown_pct,
            recovery_factor: ratio(net_profit, max_drawdown),
            initial_balance,
            current_balance: balance,
            peak_balance: peak,
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}
