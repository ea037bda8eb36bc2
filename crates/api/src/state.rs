use aula_config::Settings;
use aula_services::{
    AttendanceService, ClassroomService,
    provider::{SessionProvider, twilio::TwilioVideoProvider},
    store::{
        AttendanceStore, ClassroomStore,
        mongo::{MongoAttendanceStore, MongoClassroomStore},
    },
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub classrooms: Arc<ClassroomService>,
    pub attendance: Arc<AttendanceService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let provider: Arc<dyn SessionProvider> =
            Arc::new(TwilioVideoProvider::new(&settings.provider));
        let classroom_store: Arc<dyn ClassroomStore> = Arc::new(MongoClassroomStore::new(&db));
        let attendance_store: Arc<dyn AttendanceStore> = Arc::new(MongoAttendanceStore::new(&db));

        Self::from_parts(settings, classroom_store, attendance_store, provider)
    }

    /// Wires the state from explicit collaborators; the integration tests use
    /// this with in-memory stores and a scripted provider.
    pub fn from_parts(
        settings: Settings,
        classroom_store: Arc<dyn ClassroomStore>,
        attendance_store: Arc<dyn AttendanceStore>,
        provider: Arc<dyn SessionProvider>,
    ) -> Self {
        let classrooms = Arc::new(ClassroomService::new(classroom_store, provider));
        let attendance = Arc::new(AttendanceService::new(attendance_store));

        Self {
            settings,
            classrooms,
            attendance,
        }
    }

    /// Callback URL handed to the provider for room events.
    pub fn room_callback_url(&self) -> String {
        format!(
            "{}{}",
            self.settings.app.public_base_url, self.settings.provider.room_callback_path
        )
    }
}
