// src/services/messaging.rs

use async_trait::async_trait;
use uuid::Uuid;

// Colaborador de mensagens de saída (recibo via WhatsApp ou similar).
// O estado financeiro nunca depende do sucesso do envio: quem chama
// trata a falha como best-effort.
#[async_trait]
pub trait ReceiptMessenger: Send + Sync {
    // Retorna o identificador de entrega do provedor.
    async fn send_receipt(&self, destination: &str, body: &str) -> anyhow::Result<String>;
}

// Implementação padrão: só loga. Útil em desenvolvimento e como fallback
// enquanto nenhum provedor real está configurado.
pub struct LogMessenger;

#[async_trait]
impl ReceiptMessenger for LogMessenger {
    async fn send_receipt(&self, destination: &str, body: &str) -> anyhow::Result<String> {
        let delivery_id = Uuid::new_v4().to_string();
        tracing::info!(
            "📨 Recibo enviado para {} (delivery {}): {}",
            destination,
            delivery_id,
            body
        );
        Ok(delivery_id)
    }
}
