//! DeFi sub-decision taken when an agent enters the `defi` state, plus the
//! yields paid out when it leaves.

use rand::Rng;

use crate::agent::Agent;
use crate::catalog::{self, TOKEN_TICKERS};
use crate::context::TickContext;
use crate::types::ActivityKind;

/// Balance needed for any capital-moving action.
pub const MIN_DEFI_BALANCE: f64 = 60.0;
/// Balance needed (with `MIN_TOKEN_INTELLIGENCE`) to launch a token.
pub const MIN_TOKEN_BALANCE: f64 = 100.0;
pub const MIN_TOKEN_INTELLIGENCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefiAction {
    Stake,
    Lend,
    ProvideLiquidity,
    YieldFarm,
    CreateToken,
    Research,
}

impl DefiAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DefiAction::Stake => "stake",
            DefiAction::Lend => "lend",
            DefiAction::ProvideLiquidity => "provide_liquidity",
            DefiAction::YieldFarm => "yield_farm",
            DefiAction::CreateToken => "create_token",
            DefiAction::Research => "research_defi",
        }
    }
}

/// Menu of actions the agent can afford. Never empty.
pub fn available_actions(agent: &Agent) -> Vec<DefiAction> {
    let mut actions = Vec::with_capacity(5);
    if agent.money > MIN_DEFI_BALANCE {
        actions.extend([
            DefiAction::Stake,
            DefiAction::Lend,
            DefiAction::ProvideLiquidity,
            DefiAction::YieldFarm,
        ]);
    }
    if agent.money > MIN_TOKEN_BALANCE && agent.intelligence > MIN_TOKEN_INTELLIGENCE {
        actions.push(DefiAction::CreateToken);
    }
    if actions.is_empty() {
        actions.push(DefiAction::Research);
    }
    actions
}

/// Pick an affordable action and carry it out.
pub fn choose_and_execute<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) -> DefiAction {
    let actions = available_actions(agent);
    let action = catalog::pick(ctx.rng, &actions)
        .copied()
        .unwrap_or(DefiAction::Research);
    execute(agent, action, ctx);
    action
}

pub fn execute<R: Rng>(agent: &mut Agent, action: DefiAction, ctx: &mut TickContext<'_, R>) {
    match action {
        DefiAction::Stake => {
            let amount = (agent.money * (0.10 + ctx.roll() * 0.15)).floor();
            agent.money -= amount;
            agent.staked += amount;
            ctx.stats.staked += amount;
            agent.show_bubble("🔒");
            let text = format!(
                "🔒 Staked {amount} Crypto for passive yield (total staked: {})",
                agent.staked
            );
            ctx.narrate(agent, ActivityKind::Defi, "🔒", text);
        }
        DefiAction::Lend => {
            let amount = (agent.money * (0.05 + ctx.roll() * 0.10)).floor();
            agent.money -= amount;
            agent.lent += amount;
            ctx.stats.lent += amount;
            let apy = 3.0 + ctx.roll() * 12.0;
            agent.show_bubble("🏦");
            let text = format!("🏦 Lent {amount} Crypto at {apy:.1}% APY");
            ctx.narrate(agent, ActivityKind::Defi, "🏦", text);
        }
        DefiAction::CreateToken => {
            let ticker = catalog::pick_text(ctx.rng, &TOKEN_TICKERS, TOKEN_TICKERS[0]);
            let token = format!("{ticker}{}", ctx.rng.random_range(0..99));
            let cost = ctx.rng.random_range(30..80) as f64;
            agent.spend(cost);
            agent.tokens.push(token.clone());
            ctx.stats.tokens_created += 1;
            agent.show_bubble("🪙");
            let text = format!("🪙 Created token {token} via vibe coding! Cost: {cost} Crypto");
            ctx.narrate(agent, ActivityKind::Defi, "🪙", text);
        }
        DefiAction::ProvideLiquidity => {
            let amount = (agent.money * 0.08).floor();
            agent.spend(amount);
            agent.show_bubble("💧");
            let text = format!("💧 Provided {amount} Crypto liquidity to DEX pool");
            ctx.narrate(agent, ActivityKind::Defi, "💧", text);
        }
        DefiAction::YieldFarm => {
            agent.show_bubble("🌾");
            ctx.narrate(
                agent,
                ActivityKind::Defi,
                "🌾",
                "🌾 Yield farming across DeFi protocols for max APY",
            );
        }
        DefiAction::Research => {
            agent.show_bubble("📊");
            ctx.narrate(
                agent,
                ActivityKind::Defi,
                "📊",
                "📊 Researching DeFi protocols and yield strategies",
            );
        }
    }
}

/// Staking yield and lending interest paid when a DeFi session ends.
pub fn collect_yields<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    if agent.staked > 0.0 {
        let reward = (agent.staked * (0.005 + ctx.roll() * 0.01)).floor();
        if reward > 0.0 {
            agent.earn(reward);
            ctx.stats.record_earnings(reward);
            let text = format!(
                "📈 Staking yield: +{reward} Crypto (staked: {})",
                agent.staked
            );
            ctx.narrate(agent, ActivityKind::Defi, "📈", text);
        }
    }
    if agent.lent > 0.0 {
        let interest = (agent.lent * (0.003 + ctx.roll() * 0.008)).floor();
        if interest > 0.0 {
            agent.earn(interest);
            ctx.stats.record_earnings(interest);
            let text = format!(
                "📈 Lending interest: +{interest} Crypto (lent: {})",
                agent.lent
            );
            ctx.narrate(agent, ActivityKind::Defi, "📈", text);
        }
    }
}
