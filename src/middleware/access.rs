// src/middleware/access.rs

// Política de acesso por tenant/agência.
//
// Regra: toda leitura e escrita é restrita ao tenant do chamador. Papéis
// não privilegiados são adicionalmente restritos à sua agência. A mesma
// política vale para listagens E para buscas por id — nenhum endpoint
// escapa do can_access.

use uuid::Uuid;

use crate::{common::error::AppError, middleware::auth::TenantContext};

// Filtro derivado do contexto, consumido pelos repositórios.
// O curinga "todas as agências" é um campo explícito: um papel comum sem
// agência NÃO vira curinga, ele só enxerga recursos sem agência.
#[derive(Debug, Clone, Copy)]
pub struct AccessScope {
    pub tenant_id: Uuid,
    pub all_agencies: bool,
    pub agency_id: Option<Uuid>,
}

impl AccessScope {
    // Espelho em memória do filtro SQL das listagens. Precisa concordar
    // com can_access para que lista e busca por id apliquem a mesma regra.
    pub fn permits(&self, resource_agency_id: Option<Uuid>) -> bool {
        self.all_agencies || resource_agency_id.is_none() || resource_agency_id == self.agency_id
    }
}

impl TenantContext {
    pub fn scope(&self) -> AccessScope {
        AccessScope {
            tenant_id: self.tenant_id,
            all_agencies: self.role.is_privileged(),
            agency_id: if self.role.is_privileged() {
                None
            } else {
                self.agency_id
            },
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

// Decide se o chamador pode tocar em um recurso concreto.
// - tenant diferente: nunca;
// - papel privilegiado: qualquer agência do seu tenant;
// - senão: a agência precisa bater, ou o recurso não ter agência.
pub fn can_access(
    ctx: &TenantContext,
    resource_tenant_id: Uuid,
    resource_agency_id: Option<Uuid>,
) -> bool {
    if ctx.tenant_id != resource_tenant_id {
        return false;
    }
    if ctx.role.is_privileged() {
        return true;
    }
    match (ctx.agency_id, resource_agency_id) {
        (_, None) => true,
        (Some(mine), Some(theirs)) => mine == theirs,
        (None, Some(_)) => false,
    }
}

// Versão com erro: tenant errado vira NotFound (não revelamos existência),
// agência errada vira Forbidden.
pub fn ensure_access(
    ctx: &TenantContext,
    resource_tenant_id: Uuid,
    resource_agency_id: Option<Uuid>,
    not_found_code: &'static str,
) -> Result<(), AppError> {
    if ctx.tenant_id != resource_tenant_id {
        return Err(AppError::NotFound(not_found_code));
    }
    if !can_access(ctx, resource_tenant_id, resource_agency_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn ctx(role: Role, tenant: Uuid, agency: Option<Uuid>) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            tenant_id: tenant,
            agency_id: agency,
            role,
        }
    }

    #[test]
    fn cross_tenant_is_always_denied() {
        let tenant = Uuid::new_v4();
        let other = Uuid::new_v4();
        let c = ctx(Role::Owner, tenant, None);
        assert!(!can_access(&c, other, None));
        assert!(matches!(
            ensure_access(&c, other, None, "order_not_found"),
            Err(AppError::NotFound("order_not_found"))
        ));
    }

    #[test]
    fn privileged_roles_see_all_agencies() {
        let tenant = Uuid::new_v4();
        let agency = Uuid::new_v4();
        for role in [Role::SuperAdmin, Role::Owner, Role::Admin, Role::PressingAdmin] {
            let c = ctx(role, tenant, Some(Uuid::new_v4()));
            assert!(can_access(&c, tenant, Some(agency)));
            assert!(c.scope().all_agencies);
        }
    }

    #[test]
    fn regular_roles_are_scoped_to_their_agency() {
        let tenant = Uuid::new_v4();
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        for role in [Role::Agent, Role::Collector, Role::Client] {
            let c = ctx(role, tenant, Some(mine));
            assert!(can_access(&c, tenant, Some(mine)));
            assert!(!can_access(&c, tenant, Some(theirs)));
            assert!(!c.scope().all_agencies);
            assert_eq!(c.scope().agency_id, Some(mine));
        }
    }

    #[test]
    fn resource_without_agency_is_tenant_wide() {
        let tenant = Uuid::new_v4();
        let c = ctx(Role::Agent, tenant, Some(Uuid::new_v4()));
        assert!(can_access(&c, tenant, None));
    }

    #[test]
    fn agency_mismatch_is_forbidden_not_notfound() {
        let tenant = Uuid::new_v4();
        let c = ctx(Role::Agent, tenant, Some(Uuid::new_v4()));
        assert!(matches!(
            ensure_access(&c, tenant, Some(Uuid::new_v4()), "order_not_found"),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn agent_without_agency_cannot_touch_agency_resources() {
        let tenant = Uuid::new_v4();
        let c = ctx(Role::Agent, tenant, None);
        assert!(!can_access(&c, tenant, Some(Uuid::new_v4())));
    }

    // Um CLIENT de aplicativo nasce sem agência: seu escopo de listagem não
    // pode virar o curinga reservado aos papéis privilegiados.
    #[test]
    fn client_without_agency_does_not_get_tenant_wide_scope() {
        let tenant = Uuid::new_v4();
        let c = ctx(Role::Client, tenant, None);
        let scope = c.scope();
        assert!(!scope.all_agencies);
        assert!(scope.permits(None));
        assert!(!scope.permits(Some(Uuid::new_v4())));

        let owner = ctx(Role::Owner, tenant, None);
        assert!(owner.scope().all_agencies);
        assert!(owner.scope().permits(Some(Uuid::new_v4())));
    }

    #[test]
    fn scope_and_can_access_agree_for_every_role() {
        let tenant = Uuid::new_v4();
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        let all_roles = [
            Role::SuperAdmin,
            Role::Owner,
            Role::Admin,
            Role::PressingAdmin,
            Role::Agent,
            Role::Collector,
            Role::Client,
        ];
        for role in all_roles {
            for agency in [None, Some(mine)] {
                let c = ctx(role, tenant, agency);
                for resource in [None, Some(mine), Some(theirs)] {
                    assert_eq!(
                        c.scope().permits(resource),
                        can_access(&c, tenant, resource),
                        "role {:?}, agência {:?}, recurso {:?}",
                        role,
                        agency,
                        resource
                    );
                }
            }
        }
    }
}
