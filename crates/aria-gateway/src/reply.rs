// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic reply templates.

use aria_core::{NextAction, Route};
use aria_router::ClassificationOutput;

/// Route label reported when only the knowledge base had something to say.
pub const FAQ_ROUTE: &str = "faq";

pub const CONTEXT_REPLY: &str =
    "Encontrei estes trechos relevantes e respondi com base neles.";

pub const RECEIVING_REPLY: &str = "Entendi que você recebeu uma notificação. \
A AR Online é o meio de envio; o conteúdo deve ser tratado diretamente com o \
remetente indicado na mensagem.";

pub const ASK_VOLUME_REPLY: &str = "Certo! Informe uma estimativa do volume \
mensal (ex.: 50, 300, 1500) para sugerir o melhor caminho.";

pub const SCHEDULE_REPLY: &str = "Para envios com alto volume (a partir de 1200 \
mensagens/mês), o ideal é conversar com nosso time comercial. Posso encaminhar \
você para agendar um horário?";

pub const BUY_CREDITS_REPLY: &str = "Para volumes abaixo de 1200 mensagens/mês, \
você pode comprar créditos diretamente na nossa loja e começar a enviar hoje mesmo.";

pub const GREETING_REPLY: &str = "Como posso te ajudar hoje?";

/// A chosen reply and the route label to report with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: &'static str,
    pub route: Option<String>,
}

/// Pick the reply for a classified turn.
///
/// Knowledge context wins over every route; a sending turn with no volume
/// information at all asks for an estimate instead of guessing.
pub fn compose_reply(output: &ClassificationOutput, has_context: bool) -> Reply {
    let route = output.route.map(|r| r.to_string());

    if has_context {
        return Reply {
            text: CONTEXT_REPLY,
            route: route.or_else(|| Some(FAQ_ROUTE.to_string())),
        };
    }

    let text = match (output.route, output.next_action) {
        (Some(Route::Receiving), _) => RECEIVING_REPLY,
        (Some(Route::Sending), _) if !volume_stated(output) => ASK_VOLUME_REPLY,
        (Some(Route::Sending), Some(NextAction::Schedule)) => SCHEDULE_REPLY,
        (Some(Route::Sending), _) => BUY_CREDITS_REPLY,
        (None, _) => GREETING_REPLY,
    };
    Reply { text, route }
}

fn volume_stated(output: &ClassificationOutput) -> bool {
    output
        .volume
        .is_some_and(|v| v.parsed_number.is_some() || v.high_volume_keyword_present)
}
