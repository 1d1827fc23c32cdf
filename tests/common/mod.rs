//! Dobles en memoria para las pruebas de integración
//!
//! `MemoryStore` implementa todos los repositorios sobre vectores protegidos
//! por un `Mutex`, y los servicios externos se reemplazan por fakes que
//! registran lo que reciben.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use seguridad_auth::config::EnvironmentConfig;
use seguridad_auth::dto::auth_dto::UsuarioToken;
use seguridad_auth::models::aplicacion::{banderas, Aplicacion, FuncionarioAplicacion};
use seguridad_auth::models::codigo::{CodigoVerificacion, NuevoCodigo, TipoCodigo};
use seguridad_auth::models::funcionario::{Funcionario, FuncionarioPerfil, Persona};
use seguridad_auth::models::rol::Rol;
use seguridad_auth::models::sesion::{LogSesion, NuevaSesion, Sesion, SESION_ACTIVA, SESION_CERRADA};
use seguridad_auth::models::usuario::{DatosUsuario, FiltroUsuarios, NuevoUsuario, Usuario};
use seguridad_auth::repositories::{
    AplicacionRepository, AuthRepository, FuncionarioRepository, Repositories, RolRepository,
    SesionRepository, UsuarioRepository,
};
use seguridad_auth::services::ciudadania_service::IdentityVerifier;
use seguridad_auth::services::sms_service::SmsSender;
use seguridad_auth::services::token_verifier::{Autorizacion, TokenVerifier};
use seguridad_auth::services::{AuthService, AuthSettings, UsuarioService};
use seguridad_auth::state::AppState;
use seguridad_auth::utils::errors::{AppError, AppResult};
use seguridad_auth::utils::jwt::JwtService;

pub const SECRET: &str = "secreto-de-pruebas";
pub const PASSWORD: &str = "Passw0rd!";

#[derive(Default)]
struct Tablas {
    funcionarios: Vec<Funcionario>,
    personas: Vec<Persona>,
    aplicaciones: Vec<Aplicacion>,
    accesos: Vec<FuncionarioAplicacion>,
    sesiones: Vec<Sesion>,
    logs: Vec<LogSesion>,
    roles: Vec<(i32, Rol)>,
    permisos: Vec<(i32, String)>,
    globales: HashMap<String, bool>,
    codigos: Vec<(TipoCodigo, CodigoVerificacion)>,
    usuarios: Vec<Usuario>,
}

#[derive(Default)]
pub struct MemoryStore {
    tablas: Mutex<Tablas>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            funcionarios: self.clone(),
            aplicaciones: self.clone(),
            sesiones: self.clone(),
            roles: self.clone(),
            auth: self.clone(),
        }
    }

    pub fn agregar_persona(&self, id: i32, nombre: &str, ci: &str, celular: &str) {
        self.tablas.lock().unwrap().personas.push(Persona {
            id,
            nombre: nombre.to_string(),
            paterno: Some("Pérez".to_string()),
            materno: None,
            ci: ci.to_string(),
            celular: Some(celular.to_string()),
            email: Some(format!("{}@example.com", nombre.to_lowercase())),
            direccion: None,
        });
    }

    pub fn agregar_funcionario(&self, id: i32, usuario: &str, password_hash: &str, persona_id: i32, doble: bool) {
        self.tablas.lock().unwrap().funcionarios.push(Funcionario {
            id,
            usuario: usuario.to_string(),
            password: password_hash.to_string(),
            perfil_persona_id: persona_id,
            doble_autenticacion: doble,
            estado: 1,
        });
    }

    pub fn agregar_aplicacion(&self, id: i32, codigo: &str, cantidad_sesiones: i32, tiempo_token: i64) {
        self.tablas.lock().unwrap().aplicaciones.push(Aplicacion {
            id,
            codigo: codigo.to_string(),
            nombre: format!("Sistema {}", codigo),
            url: Some(format!("https://{}.example.com/", codigo.to_lowercase())),
            cantidad_sesiones,
            tiempo_token,
            doble_autenticacion: false,
            ciudadania: false,
            estado: 1,
        });
    }

    pub fn dar_acceso(&self, funcionario_id: i32, aplicacion_id: i32, estado: i16) {
        let mut tablas = self.tablas.lock().unwrap();
        let id = tablas.accesos.len() as i32 + 1;
        tablas.accesos.push(FuncionarioAplicacion {
            id,
            funcionario_id,
            aplicacion_id,
            estado,
        });
    }

    pub fn agregar_rol(&self, funcionario_id: i32, rol_id: i32, aplicacion_id: i32, doble: bool, permisos: &[&str]) {
        let mut tablas = self.tablas.lock().unwrap();
        tablas.roles.push((
            funcionario_id,
            Rol {
                id: rol_id,
                nombre: format!("ROL_{}", rol_id),
                aplicacion_id,
                doble_autenticacion: doble,
            },
        ));
        for permiso in permisos {
            tablas.permisos.push((rol_id, permiso.to_string()));
        }
    }

    pub fn fijar_global(&self, codigo: &str, estado: bool) {
        self.tablas.lock().unwrap().globales.insert(codigo.to_string(), estado);
    }

    pub fn sesiones_activas(&self, funcionario_id: i32, aplicacion_id: i32) -> usize {
        self.tablas
            .lock()
            .unwrap()
            .sesiones
            .iter()
            .filter(|s| {
                s.funcionario_id == funcionario_id && s.aplicacion_id == aplicacion_id && s.estado == SESION_ACTIVA
            })
            .count()
    }

    pub fn total_logs(&self) -> usize {
        self.tablas.lock().unwrap().logs.len()
    }

    pub fn ultimo_codigo_enviado(&self, tipo: TipoCodigo) -> Option<CodigoVerificacion> {
        self.tablas
            .lock()
            .unwrap()
            .codigos
            .iter()
            .rev()
            .find(|(t, _)| *t == tipo)
            .map(|(_, codigo)| codigo.clone())
    }

    /// Retrasa la fecha de todos los códigos registrados
    pub fn envejecer_codigos(&self, minutos: i64) {
        for (_, codigo) in self.tablas.lock().unwrap().codigos.iter_mut() {
            codigo.fecha = codigo.fecha - Duration::minutes(minutos);
        }
    }

    pub fn password_de(&self, funcionario_id: i32) -> Option<String> {
        self.tablas
            .lock()
            .unwrap()
            .funcionarios
            .iter()
            .find(|f| f.id == funcionario_id)
            .map(|f| f.password.clone())
    }

    pub fn agregar_usuario(&self, id: i32, usuario: &str, numero_documento: &str, estado: i16) {
        let ahora = Utc::now();
        self.tablas.lock().unwrap().usuarios.push(Usuario {
            id,
            usuario: usuario.to_string(),
            password: "hash".to_string(),
            nombre_completo: format!("{} Pérez Gómez", usuario),
            nombre: usuario.to_string(),
            paterno: "Pérez".to_string(),
            materno: "Gómez".to_string(),
            numero_documento: numero_documento.to_string(),
            direccion: "Calle 1".to_string(),
            celular: 70000000,
            email: format!("{}@example.com", usuario),
            estado,
            funcionario_id_create: 1,
            funcionario_id_update: 1,
            created_at: ahora,
            updated_at: ahora,
        });
    }

    pub fn usuario(&self, id: i32) -> Option<Usuario> {
        self.tablas.lock().unwrap().usuarios.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl FuncionarioRepository for MemoryStore {
    async fn find_by_usuario(&self, usuario: &str) -> AppResult<Option<Funcionario>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .funcionarios
            .iter()
            .find(|f| f.usuario == usuario && f.estado != 0)
            .cloned())
    }

    async fn find_by_persona(&self, persona_id: i32) -> AppResult<Option<Funcionario>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .funcionarios
            .iter()
            .find(|f| f.perfil_persona_id == persona_id && f.estado != 0)
            .cloned())
    }

    async fn find_persona(&self, persona_id: i32) -> AppResult<Option<Persona>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas.personas.iter().find(|p| p.id == persona_id).cloned())
    }

    async fn find_persona_by_ci(&self, ci: &str) -> AppResult<Option<Persona>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas.personas.iter().find(|p| p.ci == ci).cloned())
    }

    async fn perfil(&self, funcionario_id: i32) -> AppResult<Option<FuncionarioPerfil>> {
        let tablas = self.tablas.lock().unwrap();
        let Some(funcionario) = tablas.funcionarios.iter().find(|f| f.id == funcionario_id) else {
            return Ok(None);
        };
        let Some(persona) = tablas.personas.iter().find(|p| p.id == funcionario.perfil_persona_id) else {
            return Ok(None);
        };

        Ok(Some(FuncionarioPerfil {
            funcionario_id: funcionario.id,
            persona_id: persona.id,
            usuario: funcionario.usuario.clone(),
            nombre: persona.nombre.clone(),
            paterno: persona.paterno.clone(),
            materno: persona.materno.clone(),
            ci: persona.ci.clone(),
            celular: persona.celular.clone(),
            email: persona.email.clone(),
            cargo: Some("Analista".to_string()),
            institucion_id: Some(1),
            institucion: Some("Ministerio".to_string()),
        }))
    }

    async fn update_password(&self, funcionario_id: i32, password_hash: &str) -> AppResult<()> {
        let mut tablas = self.tablas.lock().unwrap();
        if let Some(funcionario) = tablas.funcionarios.iter_mut().find(|f| f.id == funcionario_id) {
            funcionario.password = password_hash.to_string();
        }
        Ok(())
    }
}

#[async_trait]
impl AplicacionRepository for MemoryStore {
    async fn find_by_codigo(&self, codigo: &str) -> AppResult<Option<Aplicacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .aplicaciones
            .iter()
            .find(|a| a.codigo == codigo && a.estado == 1)
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Aplicacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas.aplicaciones.iter().find(|a| a.id == id).cloned())
    }

    async fn acceso(&self, funcionario_id: i32, aplicacion_id: i32) -> AppResult<Option<FuncionarioAplicacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .accesos
            .iter()
            .find(|a| a.funcionario_id == funcionario_id && a.aplicacion_id == aplicacion_id)
            .cloned())
    }

    async fn aplicaciones_de(&self, funcionario_id: i32) -> AppResult<Vec<Aplicacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .accesos
            .iter()
            .filter(|a| a.funcionario_id == funcionario_id && a.habilitado())
            .filter_map(|a| {
                tablas
                    .aplicaciones
                    .iter()
                    .find(|app| app.id == a.aplicacion_id && app.estado == 1)
                    .cloned()
            })
            .collect())
    }
}

#[async_trait]
impl SesionRepository for MemoryStore {
    async fn contar_activas(&self, funcionario_id: i32, aplicacion_id: i32) -> AppResult<i64> {
        let tablas = self.tablas.lock().unwrap();
        Ok(propias_activas(&tablas.sesiones, funcionario_id, aplicacion_id) as i64)
    }

    async fn insertar_con_cupo(&self, sesion: &NuevaSesion, maximo: i32) -> AppResult<Option<i64>> {
        let mut tablas = self.tablas.lock().unwrap();
        let activas = propias_activas(&tablas.sesiones, sesion.funcionario_id, sesion.aplicacion_id) as i64;
        if activas >= i64::from(maximo) {
            return Ok(None);
        }

        Ok(Some(insertar_sesion(&mut tablas, sesion, None)))
    }

    async fn insertar_vinculada(&self, sesion: &NuevaSesion, padre_id: i64) -> AppResult<i64> {
        let mut tablas = self.tablas.lock().unwrap();
        Ok(insertar_sesion(&mut tablas, sesion, Some(padre_id)))
    }

    async fn find_activa_por_token(&self, token: &str) -> AppResult<Option<Sesion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .sesiones
            .iter()
            .rev()
            .find(|s| s.token == token && s.estado == SESION_ACTIVA)
            .cloned())
    }

    async fn renovar_token(&self, sesion_id: i64, token: &str) -> AppResult<()> {
        let mut tablas = self.tablas.lock().unwrap();
        if let Some(sesion) = tablas.sesiones.iter_mut().find(|s| s.id == sesion_id) {
            sesion.token = token.to_string();
        }
        Ok(())
    }

    async fn cerrar(&self, sesion_id: i64) -> AppResult<()> {
        let mut tablas = self.tablas.lock().unwrap();
        for sesion in tablas
            .sesiones
            .iter_mut()
            .filter(|s| s.id == sesion_id || s.sesion_padre_id == Some(sesion_id))
        {
            sesion.estado = SESION_CERRADA;
        }
        Ok(())
    }

    async fn registrar_log(&self, log: &LogSesion) -> AppResult<()> {
        self.tablas.lock().unwrap().logs.push(log.clone());
        Ok(())
    }
}

fn propias_activas(sesiones: &[Sesion], funcionario_id: i32, aplicacion_id: i32) -> usize {
    sesiones
        .iter()
        .filter(|s| {
            s.funcionario_id == funcionario_id
                && s.aplicacion_id == aplicacion_id
                && s.estado == SESION_ACTIVA
                && s.sesion_padre_id.is_none()
        })
        .count()
}

fn insertar_sesion(tablas: &mut Tablas, sesion: &NuevaSesion, padre_id: Option<i64>) -> i64 {
    let id = tablas.sesiones.len() as i64 + 1;
    tablas.sesiones.push(Sesion {
        id,
        funcionario_id: sesion.funcionario_id,
        aplicacion_id: sesion.aplicacion_id,
        token: sesion.token.clone(),
        estado: SESION_ACTIVA,
        sesion_padre_id: padre_id,
        created_at: Utc::now(),
    });
    id
}

#[async_trait]
impl RolRepository for MemoryStore {
    async fn roles_de(&self, funcionario_id: i32, aplicacion_id: Option<i32>) -> AppResult<Vec<Rol>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .roles
            .iter()
            .filter(|(fid, rol)| {
                *fid == funcionario_id && aplicacion_id.map_or(true, |app| rol.aplicacion_id == app)
            })
            .map(|(_, rol)| rol.clone())
            .collect())
    }

    async fn permisos_de_roles(&self, rol_ids: &[i32]) -> AppResult<Vec<String>> {
        let tablas = self.tablas.lock().unwrap();
        let permisos = &tablas.permisos;
        Ok(rol_ids
            .iter()
            .flat_map(|rol_id| {
                permisos
                    .iter()
                    .filter(move |(rid, _)| rid == rol_id)
                    .map(|(_, nombre)| nombre.clone())
            })
            .collect())
    }
}

#[async_trait]
impl AuthRepository for MemoryStore {
    async fn estado_global(&self, codigo: &str) -> AppResult<Option<bool>> {
        Ok(self.tablas.lock().unwrap().globales.get(codigo).copied())
    }

    async fn insertar_codigo(&self, tipo: TipoCodigo, codigo: &NuevoCodigo) -> AppResult<i64> {
        let mut tablas = self.tablas.lock().unwrap();
        let id = tablas.codigos.len() as i64 + 1;
        tablas.codigos.push((
            tipo,
            CodigoVerificacion {
                id,
                funcionario_id: codigo.funcionario_id,
                aplicacion_id: codigo.aplicacion_id,
                codigo: codigo.codigo,
                fecha: codigo.fecha,
                usado: false,
            },
        ));
        Ok(id)
    }

    async fn ultimo_codigo(
        &self,
        tipo: TipoCodigo,
        funcionario_id: i32,
        aplicacion_id: i32,
    ) -> AppResult<Option<CodigoVerificacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .codigos
            .iter()
            .rev()
            .find(|(t, c)| *t == tipo && c.funcionario_id == funcionario_id && c.aplicacion_id == aplicacion_id)
            .map(|(_, c)| c.clone()))
    }

    async fn codigo_por_id(&self, tipo: TipoCodigo, id: i64) -> AppResult<Option<CodigoVerificacion>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas
            .codigos
            .iter()
            .find(|(t, c)| *t == tipo && c.id == id)
            .map(|(_, c)| c.clone()))
    }

    async fn marcar_usado(&self, tipo: TipoCodigo, id: i64) -> AppResult<()> {
        let mut tablas = self.tablas.lock().unwrap();
        if let Some((_, codigo)) = tablas.codigos.iter_mut().find(|(t, c)| *t == tipo && c.id == id) {
            codigo.usado = true;
        }
        Ok(())
    }
}

#[async_trait]
impl UsuarioRepository for MemoryStore {
    async fn list_activos(&self) -> AppResult<Vec<Usuario>> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas.usuarios.iter().filter(|u| u.estado == 1).cloned().collect())
    }

    async fn list_filtrado(&self, filtro: &FiltroUsuarios) -> AppResult<(Vec<Usuario>, i64)> {
        let tablas = self.tablas.lock().unwrap();
        let coincidentes: Vec<Usuario> = tablas
            .usuarios
            .iter()
            .filter(|u| filtro.estado.map_or(true, |estado| u.estado == estado))
            .filter(|u| {
                filtro.busqueda.as_deref().map_or(true, |busqueda| {
                    let busqueda = busqueda.to_lowercase();
                    u.nombre_completo.to_lowercase().contains(&busqueda)
                        || u.numero_documento.contains(&busqueda)
                })
            })
            .cloned()
            .collect();

        let total = coincidentes.len() as i64;
        let pagina = coincidentes
            .into_iter()
            .skip(filtro.offset() as usize)
            .take(filtro.per_page as usize)
            .collect();
        Ok((pagina, total))
    }

    async fn existe_documento(&self, numero_documento: &str) -> AppResult<bool> {
        let tablas = self.tablas.lock().unwrap();
        Ok(tablas.usuarios.iter().any(|u| u.numero_documento == numero_documento))
    }

    async fn insert(&self, usuario: &NuevoUsuario, autor: i32) -> AppResult<i32> {
        let mut tablas = self.tablas.lock().unwrap();
        let id = tablas.usuarios.len() as i32 + 1;
        let ahora = Utc::now();
        let datos = &usuario.datos;
        tablas.usuarios.push(Usuario {
            id,
            usuario: usuario.usuario.clone(),
            password: usuario.password_hash.clone(),
            nombre_completo: datos.nombre_completo(),
            nombre: datos.nombre.clone(),
            paterno: datos.paterno.clone(),
            materno: datos.materno.clone(),
            numero_documento: datos.numero_documento.clone(),
            direccion: datos.direccion.clone(),
            celular: datos.celular,
            email: datos.email.clone(),
            estado: 1,
            funcionario_id_create: autor,
            funcionario_id_update: autor,
            created_at: ahora,
            updated_at: ahora,
        });
        Ok(id)
    }

    async fn update(&self, id: i32, datos: &DatosUsuario, autor: i32) -> AppResult<u64> {
        let mut tablas = self.tablas.lock().unwrap();
        let Some(usuario) = tablas.usuarios.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        usuario.nombre_completo = datos.nombre_completo();
        usuario.nombre = datos.nombre.clone();
        usuario.paterno = datos.paterno.clone();
        usuario.materno = datos.materno.clone();
        usuario.numero_documento = datos.numero_documento.clone();
        usuario.direccion = datos.direccion.clone();
        usuario.celular = datos.celular;
        usuario.email = datos.email.clone();
        usuario.funcionario_id_update = autor;
        usuario.updated_at = Utc::now();
        Ok(1)
    }

    async fn estado(&self, id: i32) -> AppResult<Option<i16>> {
        Ok(self.usuario(id).map(|u| u.estado))
    }

    async fn cambiar_estado(&self, id: i32, estado: i16, autor: i32) -> AppResult<u64> {
        let mut tablas = self.tablas.lock().unwrap();
        let Some(usuario) = tablas.usuarios.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        usuario.estado = estado;
        usuario.funcionario_id_update = autor;
        Ok(1)
    }

    async fn delete(&self, id: i32) -> AppResult<u64> {
        let mut tablas = self.tablas.lock().unwrap();
        let antes = tablas.usuarios.len();
        tablas.usuarios.retain(|u| u.id != id);
        Ok((antes - tablas.usuarios.len()) as u64)
    }
}

/// SMS que solo registra los envíos
#[derive(Default)]
pub struct SmsRegistrado {
    pub enviados: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for SmsRegistrado {
    async fn enviar(&self, celular: &str, mensaje: &str) -> AppResult<()> {
        self.enviados
            .lock()
            .unwrap()
            .push((celular.to_string(), mensaje.to_string()));
        Ok(())
    }
}

/// Ciudadanía Digital con bitácoras conocidas
#[derive(Default)]
pub struct CiudadaniaFija {
    pub bitacoras: HashMap<String, String>,
}

#[async_trait]
impl IdentityVerifier for CiudadaniaFija {
    async fn numero_documento(&self, binnacle_id: &str) -> AppResult<String> {
        self.bitacoras
            .get(binnacle_id)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("Bitácora {} desconocida", binnacle_id)))
    }
}

/// Verificador con tokens y permisos fijos
#[derive(Default)]
pub struct VerificadorFijo {
    pub tokens: HashMap<String, Vec<String>>,
}

impl VerificadorFijo {
    pub fn con_token(token: &str, permisos: &[&str]) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(token.to_string(), permisos.iter().map(|p| p.to_string()).collect());
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for VerificadorFijo {
    async fn verificar(&self, token: &str) -> AppResult<Autorizacion> {
        let permisos = self.tokens.get(token).cloned().ok_or_else(|| {
            AppError::unauthorized("No se logró Verificar el Token.", "token", "Token inválido.")
        })?;

        Ok(Autorizacion {
            usuario: UsuarioToken {
                aplicacion_id: 1,
                funcionario_id: 7,
                persona_id: 7,
                ci: "1234567".to_string(),
                nombre_completo: "Ana Pérez".to_string(),
                usuario: Some("aperez".to_string()),
                cargo: None,
                institucion_id: None,
                institucion: None,
                celular: None,
                email: None,
            },
            permisos,
        })
    }
}

pub fn settings() -> AuthSettings {
    AuthSettings {
        time_code_autenticacion: 5,
        time_code_recover: 10,
        app_login_code: None,
        code_single_use: false,
    }
}

pub fn hash_rapido(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

/// Funcionario jdoe con acceso a APP1, sin doble autenticación activa
pub fn escenario_basico() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.agregar_persona(10, "John", "4455667", "71234567");
    store.agregar_funcionario(1, "jdoe", &hash_rapido(PASSWORD), 10, false);
    store.agregar_aplicacion(1, "APP1", 2, 3600);
    store.dar_acceso(1, 1, 1);
    store.agregar_rol(1, 100, 1, true, &["VER", "EDITAR"]);
    store.fijar_global(banderas::DOBLE_AUTENTICACION, false);
    store
}

pub struct Servicio {
    pub store: Arc<MemoryStore>,
    pub sms: Arc<SmsRegistrado>,
    pub auth: Arc<AuthService>,
}

pub fn servicio_con(store: Arc<MemoryStore>, settings: AuthSettings, identidad: CiudadaniaFija) -> Servicio {
    let sms = Arc::new(SmsRegistrado::default());
    let auth = AuthService::new(
        store.repositories(),
        JwtService::new(SECRET),
        sms.clone(),
        Arc::new(identidad),
        settings,
    );
    Servicio {
        store,
        sms,
        auth: Arc::new(auth),
    }
}

pub fn servicio(store: Arc<MemoryStore>) -> Servicio {
    servicio_con(store, settings(), CiudadaniaFija::default())
}

pub fn config_pruebas() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        database_url: "postgres://localhost/seguridad_test".to_string(),
        jwt_secret: SECRET.to_string(),
        cors_origins: Vec::new(),
        time_code_autenticacion: 5,
        time_code_recover: 10,
        app_login_code: None,
        service_login_url: "http://localhost:3000".to_string(),
        sms_service_url: None,
        ciudadania_url: None,
        max_payload_size: 1024 * 1024,
        code_single_use: false,
        http_timeout_secs: 5,
    }
}

/// Estado completo de la aplicación sobre el almacén en memoria
pub fn app_state(store: Arc<MemoryStore>, verificador: VerificadorFijo) -> AppState {
    let Servicio { auth, store, .. } = servicio(store);
    AppState {
        config: config_pruebas(),
        auth,
        usuarios: Arc::new(UsuarioService::new(store)),
        token_verifier: Arc::new(verificador),
    }
}
