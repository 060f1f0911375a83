// src/common/i18n.rs

// Catálogo estático de mensagens voltadas ao usuário, indexado por código
// estável. O Locale vem do cabeçalho Accept-Language (ver middleware/i18n).
// "fr" é o padrão do produto; "pt" e "en" completam o catálogo.

pub const DEFAULT_LOCALE: &str = "fr";

pub fn translate(locale: &str, code: &str) -> &'static str {
    match locale {
        "pt" => translate_pt(code),
        "en" => translate_en(code),
        _ => translate_fr(code),
    }
}

fn translate_fr(code: &str) -> &'static str {
    match code {
        "validation_failed" => "Un ou plusieurs champs sont invalides.",
        "unauthenticated" => "Authentification requise.",
        "invalid_token" => "Jeton d'authentification invalide ou absent.",
        "invalid_credentials" => "E-mail ou mot de passe invalide.",
        "forbidden" => "Vous n'avez pas accès à cette ressource.",
        "user_not_found" => "Utilisateur introuvable.",
        "tenant_not_found" => "Pressing introuvable.",
        "agency_not_found" => "Agence introuvable.",
        "customer_not_found" => "Client introuvable.",
        "order_not_found" => "Commande introuvable.",
        "collection_request_not_found" => "Demande de collecte introuvable.",
        "collector_not_found" => "Collecteur introuvable ou inéligible.",
        "installment_not_found" => "Échéance introuvable.",
        "notification_not_found" => "Notification introuvable.",
        "promo_not_found" => "Code promo introuvable.",
        "service_not_found" => "Service introuvable.",
        "email_already_used" => "Cet e-mail est déjà utilisé.",
        "subdomain_already_used" => "Ce sous-domaine est déjà utilisé.",
        "agency_code_already_used" => "Ce code d'agence est déjà utilisé.",
        "customer_contact_already_used" => "E-mail ou téléphone déjà utilisé par un autre client.",
        "promo_code_already_used" => "Ce code promo existe déjà.",
        "main_agency_cannot_be_deleted" => "L'agence principale ne peut pas être supprimée.",
        "agency_has_active_users" => "Des utilisateurs actifs sont rattachés à cette agence.",
        "installment_already_settled" => "Cette échéance est déjà réglée.",
        "installment_cancelled" => "Cette échéance a été annulée.",
        "installment_plan_exists" => "Un échéancier existe déjà pour cette commande.",
        "order_already_paid" => "Cette commande est déjà payée.",
        "order_cancelled" => "Cette commande a été annulée.",
        "order_under_installment_plan" => "Cette commande est payée par échéancier.",
        "invalid_transition" => "Transition d'état non autorisée.",
        "promo_not_valid" => "Ce code promo n'est pas valide actuellement.",
        "invalid_amount" => "Montant invalide.",
        "invalid_installment_count" => "Nombre d'échéances invalide (2 à 12).",
        "invalid_promo_window" => "La fenêtre de validité de la promo est invalide.",
        "unknown_collection_item" => "Article de collecte inconnu.",
        "collection_items_required" => "Au moins un article est requis.",
        "customer_required" => "Le client est obligatoire.",
        "internal" => "Une erreur inattendue s'est produite.",
        _ => "Une erreur inattendue s'est produite.",
    }
}

fn translate_pt(code: &str) -> &'static str {
    match code {
        "validation_failed" => "Um ou mais campos são inválidos.",
        "unauthenticated" => "Autenticação necessária.",
        "invalid_token" => "Token de autenticação inválido ou ausente.",
        "invalid_credentials" => "E-mail ou senha inválidos.",
        "forbidden" => "Você não tem acesso a este recurso.",
        "user_not_found" => "Usuário não encontrado.",
        "tenant_not_found" => "Pressing não encontrado.",
        "agency_not_found" => "Agência não encontrada.",
        "customer_not_found" => "Cliente não encontrado.",
        "order_not_found" => "Pedido não encontrado.",
        "collection_request_not_found" => "Solicitação de coleta não encontrada.",
        "collector_not_found" => "Coletor não encontrado ou inelegível.",
        "installment_not_found" => "Parcela não encontrada.",
        "notification_not_found" => "Notificação não encontrada.",
        "promo_not_found" => "Código promocional não encontrado.",
        "service_not_found" => "Serviço não encontrado.",
        "email_already_used" => "Este e-mail já está em uso.",
        "subdomain_already_used" => "Este subdomínio já está em uso.",
        "agency_code_already_used" => "Este código de agência já está em uso.",
        "customer_contact_already_used" => "E-mail ou telefone já usado por outro cliente.",
        "promo_code_already_used" => "Este código promocional já existe.",
        "main_agency_cannot_be_deleted" => "A agência principal não pode ser removida.",
        "agency_has_active_users" => "Há usuários ativos vinculados a esta agência.",
        "installment_already_settled" => "Esta parcela já está quitada.",
        "installment_cancelled" => "Esta parcela foi cancelada.",
        "installment_plan_exists" => "Já existe um parcelamento para este pedido.",
        "order_already_paid" => "Este pedido já está pago.",
        "order_cancelled" => "Este pedido foi cancelado.",
        "order_under_installment_plan" => "Este pedido é pago por parcelamento.",
        "invalid_transition" => "Transição de estado não permitida.",
        "promo_not_valid" => "Este código promocional não está válido no momento.",
        "invalid_amount" => "Valor inválido.",
        "invalid_installment_count" => "Quantidade de parcelas inválida (2 a 12).",
        "invalid_promo_window" => "A janela de validade da promoção é inválida.",
        "unknown_collection_item" => "Item de coleta desconhecido.",
        "collection_items_required" => "Pelo menos um item é obrigatório.",
        "customer_required" => "O cliente é obrigatório.",
        "internal" => "Ocorreu um erro inesperado.",
        _ => "Ocorreu um erro inesperado.",
    }
}

fn translate_en(code: &str) -> &'static str {
    match code {
        "validation_failed" => "One or more fields are invalid.",
        "unauthenticated" => "Authentication required.",
        "invalid_token" => "Invalid or missing authentication token.",
        "invalid_credentials" => "Invalid e-mail or password.",
        "forbidden" => "You do not have access to this resource.",
        "user_not_found" => "User not found.",
        "tenant_not_found" => "Pressing not found.",
        "agency_not_found" => "Agency not found.",
        "customer_not_found" => "Customer not found.",
        "order_not_found" => "Order not found.",
        "collection_request_not_found" => "Collection request not found.",
        "collector_not_found" => "Collector not found or not eligible.",
        "installment_not_found" => "Installment not found.",
        "notification_not_found" => "Notification not found.",
        "promo_not_found" => "Promo code not found.",
        "service_not_found" => "Service not found.",
        "email_already_used" => "This e-mail is already in use.",
        "subdomain_already_used" => "This subdomain is already in use.",
        "agency_code_already_used" => "This agency code is already in use.",
        "customer_contact_already_used" => "E-mail or phone already used by another customer.",
        "promo_code_already_used" => "This promo code already exists.",
        "main_agency_cannot_be_deleted" => "The main agency cannot be deleted.",
        "agency_has_active_users" => "Active users are attached to this agency.",
        "installment_already_settled" => "This installment is already settled.",
        "installment_cancelled" => "This installment was cancelled.",
        "installment_plan_exists" => "An installment plan already exists for this order.",
        "order_already_paid" => "This order is already paid.",
        "order_cancelled" => "This order was cancelled.",
        "order_under_installment_plan" => "This order is paid by installment plan.",
        "invalid_transition" => "State transition not allowed.",
        "promo_not_valid" => "This promo code is not currently valid.",
        "invalid_amount" => "Invalid amount.",
        "invalid_installment_count" => "Invalid installment count (2 to 12).",
        "invalid_promo_window" => "The promo validity window is invalid.",
        "unknown_collection_item" => "Unknown collection item.",
        "collection_items_required" => "At least one item is required.",
        "customer_required" => "The customer is required.",
        "internal" => "An unexpected error occurred.",
        _ => "An unexpected error occurred.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_falls_back_to_french() {
        assert_eq!(translate("de", "forbidden"), translate_fr("forbidden"));
    }

    #[test]
    fn unknown_code_yields_generic_message() {
        assert_eq!(translate("en", "no_such_code"), translate_en("internal"));
    }
}
